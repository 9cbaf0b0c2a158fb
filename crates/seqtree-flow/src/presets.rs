//! Built-in flows for the Yosys and Vivado synthesis tools.

use seqtree_core::Topology;

use crate::{FlowError, OperationSpec, SpaceSpec, spec::FLOW_SCHEMA_VERSION};

const YOSYS_SEQUENCE_LEN: usize = 9;

const YOSYS_OPERATIONS: &[(&str, &[&str])] = &[
    (
        "abc",
        &[
            "abc -dress;",
            "abc -markgroups;",
            "abc -showtmp;",
            "abc -nocleanup;",
            "abc -keepff;",
            "abc -dff;",
            "abc -sop;",
            "abc -fast;",
        ],
    ),
    (
        "opt_expr",
        &[
            "opt_expr;",
            "opt_expr -mux_undef;",
            "opt_expr -mux_bool;",
            "opt_expr -undriven;",
            "opt_expr -noclkinv;",
            "opt_expr -fine;",
            "opt_expr -full;",
            "opt_expr -keepdc;",
        ],
    ),
    ("opt_clean", &["opt_clean;", "opt_clean -purge;"]),
    ("opt_demorgan", &["opt_demorgan;"]),
    (
        "opt_dff",
        &[
            "opt_dff;",
            "opt_dff -nodffe;",
            "opt_dff -nosdff;",
            "opt_dff -keepdc;",
            "opt_dff -sat;",
        ],
    ),
    ("opt_lut", &["opt_lut;"]),
    ("opt_lut_ins", &["opt_lut_ins;"]),
    ("opt_merge", &["opt_merge;", "opt_merge -share_all;"]),
    ("opt_muxtree", &["opt_muxtree;"]),
    (
        "opt_reduce",
        &["opt_reduce;", "opt_reduce -fine;", "opt_reduce -full;"],
    ),
    ("opt_share", &["opt_share;"]),
    ("opt_ffinv", &["opt_ffinv;"]),
    ("opt_mem", &["opt_mem;"]),
    ("opt_mem_feedback", &["opt_mem_feedback;"]),
    ("opt_mem_priority", &["opt_mem_priority;"]),
    ("opt_mem_widen", &["opt_mem_widen;"]),
    ("memory_share", &["memory_share;"]),
    ("memory_collect", &["memory_collect;"]),
    ("memory_bmux2rom", &["memory_bmux2rom;"]),
    ("memory_bram", &["memory_bram;"]),
    ("memory_dff", &["memory_dff;"]),
    ("memory_libmap", &["memory_libmap;"]),
    ("memory_map", &["memory_map;"]),
    ("memory_memx", &["memory_memx;"]),
    ("memory_narrow", &["memory_narrow;"]),
    ("memory_nordff", &["memory_nordff;"]),
    ("memory_unpack", &["memory_unpack;"]),
];

const VIVADO_OPERATIONS: &[(&str, &[&str])] = &[
    (
        "synth_design",
        &[
            "synth_design -top top\n",
            "synth_design -top top -flatten_hierarchy rebuilt\n",
            "synth_design -top top -flatten_hierarchy full\n",
            "synth_design -top top -gated_clock_conversion on\n",
        ],
    ),
    (
        "opt_design",
        &["opt_design\n", "opt_design -directive Explore\n"],
    ),
    (
        "phys_opt_design",
        &[
            "phys_opt_design\n",
            "phys_opt_design -directive Explore\n",
            "phys_opt_design -retime\n",
        ],
    ),
    (
        "place_design",
        &[
            "place_design\n",
            "place_design -directive Explore\n",
            "place_design -directive ExtraNetDelay_high\n",
        ],
    ),
    (
        "route_design",
        &[
            "route_design\n",
            "route_design -directive Explore\n",
            "route_design -directive NoTimingRelaxation\n",
        ],
    ),
    (
        "phys_opt_design_2",
        &[
            "phys_opt_design\n",
            "phys_opt_design -directive AggressiveExplore\n",
        ],
    ),
    ("opt_design_post", &["opt_design\n", "opt_design -retime\n"]),
];

fn operations(table: &[(&str, &[&str])]) -> Vec<OperationSpec> {
    table
        .iter()
        .map(|(id, options)| OperationSpec {
            id: (*id).to_string(),
            options: options.iter().map(|option| (*option).to_string()).collect(),
        })
        .collect()
}

/// Nine passes drawn from a shared pool of Yosys optimization commands,
/// rendered as one `-p` script after `hierarchy; proc;`.
pub fn yosys() -> SpaceSpec {
    SpaceSpec {
        version: Some(FLOW_SCHEMA_VERSION),
        topology: Topology::UniformPool,
        prefix: "hierarchy; proc; ".to_string(),
        separator: " ".to_string(),
        suffix: String::new(),
        sequence_len: Some(YOSYS_SEQUENCE_LEN),
        operations: operations(YOSYS_OPERATIONS),
    }
}

/// One option per fixed Vivado implementation stage, rendered as Tcl lines.
pub fn vivado() -> SpaceSpec {
    SpaceSpec {
        version: Some(FLOW_SCHEMA_VERSION),
        topology: Topology::Positional,
        prefix: String::new(),
        separator: String::new(),
        suffix: String::new(),
        sequence_len: None,
        operations: operations(VIVADO_OPERATIONS),
    }
}

/// Look up a built-in flow by name.
pub fn preset(name: &str) -> Result<SpaceSpec, FlowError> {
    match name {
        "yosys" => Ok(yosys()),
        "vivado" => Ok(vivado()),
        _ => Err(FlowError::UnknownPreset {
            name: name.to_string(),
        }),
    }
}
