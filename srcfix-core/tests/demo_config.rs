//! The shipped demo configurations stay loadable.

use srcfix_core::config::{ConfigFormat, parse_config, validate};
use srcfix_edit::FixSet;

const VA2022A: &str = include_str!("../../demos/va2022a.toml");
const VA2022A_LINK: &str = include_str!("../../demos/va2022a-link.toml");

fn demo_set(contents: &str, id: &str) -> FixSet {
    let cfg = parse_config(contents, ConfigFormat::Toml).unwrap();
    let def = cfg.fix_sets.iter().find(|s| s.id == id).unwrap();
    FixSet::compile(def)
}

#[test]
fn demo_configs_validate_and_compile() {
    for (name, contents) in [("va2022a", VA2022A), ("va2022a-link", VA2022A_LINK)] {
        let cfg = parse_config(contents, ConfigFormat::Toml).expect("parse demo config");
        validate(&cfg).unwrap_or_else(|e| panic!("{name}: {e}"));

        for def in &cfg.fix_sets {
            let set = FixSet::compile(def);
            let broken: Vec<_> = set.broken_rules().collect();
            assert!(broken.is_empty(), "{name}/{}: {:?}", set.id, broken);
        }
    }
}

#[test]
fn fftw_mathlib_removal_ignores_case() {
    let set = demo_set(VA2022A_LINK, "fftw-mathlib");
    let cmake = "SET ( MATHLIB m )\nlist(APPEND fftw3f_lib ${MATHLIB})\ntarget_link_libraries(fftw3 ${MATHLIB})\n";

    let once = set.apply(cmake);
    assert_eq!(once.text, "\n\ntarget_link_libraries(fftw3 )\n");
    assert_eq!(once.rules.iter().map(|r| r.matches).collect::<Vec<_>>(), vec![1, 1, 1]);

    let twice = set.apply(&once.text);
    assert_eq!(twice.total_matches(), 0);
}

#[test]
fn legacy_stdio_is_linked_once() {
    let set = demo_set(VA2022A_LINK, "natnet-legacy-stdio");
    let cmake = "target_link_libraries(${PROJECT_NAME} PUBLIC NatNetSDK::NatNetSDK)\n";

    let once = set.apply(cmake);
    assert_eq!(
        once.text,
        "target_link_libraries(${PROJECT_NAME} PUBLIC NatNetSDK::NatNetSDK\n    $<$<PLATFORM_ID:Windows>:legacy_stdio_definitions>)\n"
    );
    assert!(once.warnings.is_empty());

    let twice = set.apply(&once.text);
    assert_eq!(twice.text, once.text);
    assert_eq!(twice.total_matches(), 0);
}

#[test]
fn va2022a_nominmax_rule_is_idempotent() {
    let set = demo_set(VA2022A, "vacore-nominmax");

    let cmake = "target_compile_definitions (VACore PUBLIC VA_CORE_EXPORTS\n    PRIVATE _USE_MATH_DEFINES)\n";
    let once = set.apply(cmake);
    assert!(once.text.contains("PRIVATE\n        NOMINMAX"));
    let twice = set.apply(&once.text);
    assert_eq!(twice.text, once.text);
    assert_eq!(twice.total_matches(), 0);
}
