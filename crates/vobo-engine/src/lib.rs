pub mod config;
pub mod engine;
pub mod relevance;
pub mod render;
pub mod scenario;

pub use config::*;
pub use engine::*;
pub use relevance::*;
pub use render::*;


#[cfg(test)]
mod scenario_tests {
    use super::scenario::*;
    use std::path::Path;

    fn run(dir: &str) -> ScenarioResult {
        let p = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/scenarios").join(dir);
        let first = simulate(&p).unwrap();
        let second = simulate(&p).unwrap();
        assert_eq!(first.verdict, second.verdict, "{dir} is not deterministic");
        first
    }

    #[test]
    fn scenario_a_non_empty_204_blocks() {
        let res = run("SC-A-204-not-empty");
        res.check().unwrap();
        assert!(!res.verdict.vobo);
    }

    #[test]
    fn scenario_b_missing_description_blocks() {
        let res = run("SC-B-missing-description");
        res.check().unwrap();
        let blocking: Vec<_> = res.verdict.blocking().collect();
        assert_eq!(blocking.len(), 1);
        assert!(blocking[0].message.contains("description"));
    }

    #[test]
    fn scenario_c_insert_covering_inputs_passes() {
        let res = run("SC-C-insert-covers-input");
        res.check().unwrap();
        assert!(res.verdict.vobo);
    }

    #[test]
    fn scenario_d_insert_missing_input_warns() {
        let res = run("SC-D-insert-missing-input");
        res.check().unwrap();
        assert!(res.verdict.vobo);
    }

    #[test]
    fn scenario_e_array_suffix_with_text_type() {
        run("SC-E-array-syntax").check().unwrap();
    }

    #[test]
    fn scenario_f_too_many_warnings_fails() {
        let res = run("SC-F-too-many-warnings");
        res.check().unwrap();
        assert!(res.verdict.blocking().next().is_none());
    }

    #[test]
    fn scenario_g_policy_override_from_fixture_config() {
        run("SC-G-threshold-disabled").check().unwrap();
    }

    #[test]
    fn scenario_h_select_missing_outputs() {
        run("SC-H-select-missing-output").check().unwrap();
    }
}
