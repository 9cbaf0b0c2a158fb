mod property_tests;
mod reward_cache_tests;
mod rollout_tests;
mod space_tests;
mod topk_tests;
