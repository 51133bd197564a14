/// Integration tests for the ripple-plot CLI.
///
/// These run the binary and check the printed numbers against hand-worked
/// values of the two ripple expressions:
/// 1. Probe values at the reference operating point
/// 2. Summary block layout
/// 3. CSV shape and determinism
/// 4. Parameter file loading and rejection of bad parameters
/// 5. SVG rendering of every figure preset
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use approx::assert_relative_eq;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "ripple-plot", "--"]);
    cmd
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(name)
}

fn run(args: &[&str]) -> Output {
    cargo_bin().args(args).output().expect("failed to run ripple-plot")
}

fn stdout_of(args: &[&str]) -> String {
    let out = run(args);
    assert!(
        out.status.success(),
        "ripple-plot {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).expect("stdout is not UTF-8")
}

/// Render `args` to `name` in the temp dir and return the SVG text.
fn render_svg(name: &str, args: &[&str]) -> String {
    let output_path = temp_path(name);
    let _ = std::fs::remove_file(&output_path);

    let out = cargo_bin()
        .args(args)
        .args(["plot", "-o"])
        .arg(&output_path)
        .output()
        .expect("failed to run ripple-plot");
    assert!(
        out.status.success(),
        "ripple-plot plot exited with error: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(output_path.exists(), "SVG file not created");

    let svg = std::fs::read_to_string(&output_path).expect("SVG is not UTF-8");
    std::fs::remove_file(&output_path).ok();
    svg
}

fn assert_contains(svg: &str, needles: &[&str]) {
    for needle in needles {
        assert!(svg.contains(needle), "SVG is missing {needle:?}");
    }
}

/// Number printed after `label:` in probe output.
fn probe_value(text: &str, label: &str) -> f64 {
    let line = text
        .lines()
        .find(|l| l.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("no {label} line in:\n{text}"));
    line.split_whitespace()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("no value in {line:?}"))
}

#[test]
fn test_probe_absolute_reference_point() {
    let text = stdout_of(&["probe", "--k", "0", "--duty", "0.25"]);
    assert_relative_eq!(probe_value(&text, "ΔIout:"), 1.5, epsilon = 1e-6);
    // 6 * 0.25 * (2 * 0.25 + 1)
    assert_relative_eq!(probe_value(&text, "ΔIleg:"), 2.25, epsilon = 1e-6);
    assert!(text.contains(" A"), "absolute probe should report amperes:\n{text}");
}

#[test]
fn test_probe_normalized_reference_point() {
    let text = stdout_of(&["--figure", "normalized", "probe", "--k", "0", "--duty", "0.25"]);
    assert_relative_eq!(probe_value(&text, "ΔIout:"), 0.125, epsilon = 1e-6);
    assert_relative_eq!(probe_value(&text, "ΔIleg:"), 0.1875, epsilon = 1e-6);
}

#[test]
fn test_probe_negative_coupling() {
    let text = stdout_of(&["probe", "--k", "-0.3", "--duty", "0.25"]);
    // 6 * 0.25 * (2/0.7 * 0.25 + 1/1.3)
    let expected = 1.5 * (0.5 / 0.7 + 1.0 / 1.3);
    assert_relative_eq!(probe_value(&text, "ΔIleg:"), expected, epsilon = 1e-5);
}

#[test]
fn test_summary_block() {
    let text = stdout_of(&["summary"]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        &lines[..7],
        &[
            "Parameters used:",
            "Vin = 12 V",
            "fs = 100 kHz",
            "Lself = 10 μH",
            "Duty cycles: [0.15, 0.25, 0.35]",
            "k range: -0.6 to 0.6",
            "Colors: ΔIout = #2E86AB, ΔIleg = #A23B72",
        ]
    );
}

#[test]
fn test_overrides_reach_summary() {
    let text = stdout_of(&["summary", "--vin", "48", "--duties", "0.1,0.2", "--k-max", "0.9"]);
    assert!(text.contains("Vin = 48 V"), "{text}");
    assert!(text.contains("Duty cycles: [0.1, 0.2]"), "{text}");
    assert!(text.contains("k range: -0.9 to 0.9"), "{text}");
}

#[test]
fn test_table_to_file() {
    let path = temp_path("ripple_plot_table_test.csv");
    let _ = std::fs::remove_file(&path);

    let out = cargo_bin()
        .args(["table", "--samples", "11", "--csv"])
        .arg(&path)
        .output()
        .expect("failed to run ripple-plot");
    assert!(out.status.success(), "table exited with error");

    let text = std::fs::read_to_string(&path).expect("CSV not written");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 12);
    assert_eq!(
        lines[0],
        "k,delta_i_out_d0.15,delta_i_leg_d0.15,delta_i_out_d0.25,delta_i_leg_d0.25,delta_i_out_d0.35,delta_i_leg_d0.35"
    );
    assert!(lines[1].starts_with("-0.6,"));
    assert!(lines[11].starts_with("0.6,"));
    for row in &lines[1..] {
        let values: Vec<f64> = row.split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(values.len(), 7);
        assert!(values.iter().all(|v| v.is_finite()), "{row}");
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_table_deterministic() {
    let args = ["--figure", "dual-axis", "table", "--samples", "101"];
    let first = stdout_of(&args);
    let second = stdout_of(&args);
    assert_eq!(first, second, "two runs with the same parameters should match");
    assert_eq!(first.lines().count(), 102);
}

#[test]
fn test_params_file() {
    let path = temp_path("ripple_plot_params_test.json");
    std::fs::write(
        &path,
        r#"{
            "normalization": "normalized",
            "converter": { "fs": 200000.0, "l_self": 4.7e-6 },
            "sweep": { "k_max": 0.8, "samples": 50, "duties": [0.2, 0.4] }
        }"#,
    )
    .unwrap();

    let text = stdout_of(&["summary", "--params", path.to_str().unwrap()]);
    assert!(text.contains("Vin = normalized"), "{text}");
    assert!(text.contains("fs = 200 kHz"), "{text}");
    assert!(text.contains("Lself = 4.7 μH"), "{text}");
    assert!(text.contains("Duty cycles: [0.2, 0.4]"), "{text}");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_rejects_k_max_at_pole() {
    let out = run(&["summary", "--k-max", "1.0"]);
    assert!(!out.status.success(), "k_max = 1 should be rejected");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("k_max"), "{stderr}");
}

#[test]
fn test_rejects_missing_params_file() {
    let out = run(&["summary", "--params", "/nonexistent/ripple_params.json"]);
    assert!(!out.status.success());
}

#[test]
fn test_normalized_summary_ignores_vin() {
    let text = stdout_of(&["--figure", "normalized", "--vin", "48", "summary"]);
    assert!(text.contains("Vin = normalized"), "{text}");
    assert!(!text.contains("48 V"), "{text}");
}

// ─── Rendering ──────────────────────────────────────────────────────────────

#[test]
fn test_cli_renders_absolute_svg() {
    let svg = render_svg("ripple_plot_absolute_test.svg", &[]);
    assert!(svg.starts_with("<svg") || svg.starts_with("<?xml"));
    assert_contains(
        &svg,
        &[
            "Current Ripple vs Coupling Factor k (Vin=12V, fs=100kHz, Lself=10μH)",
            "Current Ripple (A)",
            "D = 0.15",
            "D = 0.25",
            "D = 0.35",
            "ΔIout",
            "ΔIleg",
        ],
    );
}

#[test]
fn test_cli_renders_normalized_svg() {
    let svg = render_svg("ripple_plot_normalized_test.svg", &["--figure", "normalized"]);
    assert_contains(
        &svg,
        &[
            "Normalized Current Ripple vs Coupling Factor k (fs=100kHz, Lself=10μH)",
            "ΔI · fs·Lself / Vin",
            "D = 0.125",
            "D = 0.25",
            "D = 0.375",
            "ΔIout",
            "ΔIleg",
        ],
    );
    assert!(!svg.contains("Current Ripple (A)"));
}

#[test]
fn test_cli_renders_dual_axis_svg() {
    let svg = render_svg("ripple_plot_dual_axis_test.svg", &["--figure", "dual-axis"]);
    assert_contains(
        &svg,
        &[
            "Current Ripple vs Coupling Factor k (Vin=12V",
            "ΔIout (A)",
            "ΔIleg (A)",
            "D = 0.1",
            "D = 0.25",
            "D = 0.4",
        ],
    );
}

#[test]
fn test_params_normalization_sets_axis_label() {
    let params = temp_path("ripple_plot_label_params.json");
    std::fs::write(
        &params,
        r#"{
            "normalization": "normalized",
            "converter": { "fs": 200000.0, "l_self": 4.7e-6 },
            "sweep": { "k_max": 0.8, "samples": 200, "duties": [0.2, 0.25] }
        }"#,
    )
    .unwrap();

    let svg = render_svg(
        "ripple_plot_label_test.svg",
        &["--params", params.to_str().unwrap()],
    );
    assert!(!svg.contains("Current Ripple (A)"), "absolute label on a normalized figure");
    assert_contains(
        &svg,
        &["Normalized Current Ripple vs Coupling Factor k (fs=200kHz", "ΔI · fs·Lself / Vin"],
    );

    std::fs::remove_file(&params).ok();
}

#[test]
fn test_narrow_k_range_drops_outside_annotation() {
    // ΔIleg is anchored at k = -0.3, outside ±0.2; ΔIout at k = 0 stays.
    let narrow = render_svg("ripple_plot_narrow_test.svg", &["--k-max", "0.2"]);
    let wide = render_svg("ripple_plot_wide_test.svg", &[]);
    // Text nodes hold exactly the label on its own line.
    let count = |svg: &str, label: &str| svg.matches(&format!(">\n{label}\n</text>")).count();
    assert_eq!(count(&wide, "ΔIleg"), 1);
    assert_eq!(count(&narrow, "ΔIleg"), 0);
    assert_eq!(count(&narrow, "ΔIout"), 1);
}

#[test]
fn test_cli_default_output_path() {
    let dir = temp_path("ripple_plot_default_output");
    std::fs::create_dir_all(&dir).unwrap();
    let expected = dir.join("ripple_absolute.svg");
    let _ = std::fs::remove_file(&expected);

    let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    let status = Command::new(env!("CARGO"))
        .args(["run", "-q", "--manifest-path"])
        .arg(&manifest)
        .arg("--")
        .current_dir(&dir)
        .status()
        .expect("failed to run ripple-plot");

    assert!(status.success(), "ripple-plot exited with error");
    assert!(expected.exists(), "default ripple_absolute.svg not created");

    std::fs::remove_dir_all(&dir).ok();
}
