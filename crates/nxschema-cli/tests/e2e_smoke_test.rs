use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use nxschema_cli::{Args, run};

/// Collects all .xsd files from a directory
fn collect_xsd_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("xsd")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Schema fixtures live at the workspace root, not in the crate
fn schemas_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("schemas")
}

fn file_args(input: &Path, output: PathBuf) -> Args {
    Args {
        input: Some(input.to_string_lossy().to_string()),
        version_ref: None,
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
        root_only: false,
    }
}

#[test]
fn e2e_smoke_test_valid_schemas() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_schemas = collect_xsd_files(schemas_dir());
    assert!(!valid_schemas.is_empty(), "No valid schemas found in schemas/");

    let mut failed_schemas = Vec::new();

    for schema_path in &valid_schemas {
        let output_path = temp_dir.path().join(format!(
            "{}.txt",
            schema_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&file_args(schema_path, output_path.clone())) {
            Ok(()) => {
                let report = fs::read_to_string(&output_path).expect("Report was not written");
                assert!(
                    report.contains("[definition] "),
                    "{}: report has no definition section",
                    schema_path.display()
                );
            }
            Err(e) => failed_schemas.push((schema_path.clone(), e)),
        }
    }

    if !failed_schemas.is_empty() {
        eprintln!("\nValid schemas that failed:");
        for (path, err) in &failed_schemas {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid schema(s) failed unexpectedly", failed_schemas.len());
    }

    println!("✅ All {} valid schemas passed", valid_schemas.len());
}

#[test]
fn e2e_smoke_test_error_schemas() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_schemas = collect_xsd_files(schemas_dir().join("errors"));
    assert!(
        !error_schemas.is_empty(),
        "No error schemas found in schemas/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for schema_path in &error_schemas {
        let output_path = temp_dir.path().join(format!(
            "error_{}.txt",
            schema_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&file_args(schema_path, output_path)).is_ok() {
            unexpectedly_succeeded.push(schema_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError schemas that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error schema(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error schemas failed as expected",
        error_schemas.len()
    );
}

#[test]
fn e2e_version_ref_from_configured_cache() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let cache_dir = temp_dir.path().join("cache");
    let snapshot = cache_dir.join("v2018.5");
    fs::create_dir_all(&snapshot).unwrap();
    fs::copy(schemas_dir().join("nxdl.xsd"), snapshot.join("nxdl.xsd")).unwrap();

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[source]\ncache_dir = {:?}\n",
            cache_dir.to_string_lossy()
        ),
    )
    .unwrap();

    let output_path = temp_dir.path().join("root.txt");
    let args = Args {
        input: None,
        version_ref: Some("v2018.5".to_string()),
        output: Some(output_path.to_string_lossy().to_string()),
        config: Some(config_path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        root_only: true,
    };

    run(&args).expect("Failed to build catalog from snapshot");

    let report = fs::read_to_string(&output_path).unwrap();
    assert!(report.starts_with("[definition] Element(name=definition, type=definitionType"));
    assert!(!report.contains("[names]"));
}
