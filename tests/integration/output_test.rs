use gradle_facts::cli::commands::{analyze, emit};
use gradle_facts::core::Walker;
use gradle_facts::error::{FactsError, Result};
use gradle_facts::models::config::{AnalysisKind, OutputFormat, Settings};
use gradle_facts::output::{create_formatter, format_table_csv, write_csv_tables, Formatter, MISSING};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn create_project(dir: &Path) -> Settings {
    let root = dir.join("weather");
    write(
        &root.join("build.gradle.kts"),
        r#"
plugins {
    id("com.android.application") version "8.1.0" apply false
}
buildscript {
    dependencies {
        classpath("com.android.tools.build:gradle:8.1.0")
    }
}
allprojects {
    dependencies {
        implementation("com.jakewharton.timber:timber:5.0.1")
    }
}
"#,
    );
    write(&root.join("settings.gradle.kts"), "include(\":app\")\n");
    write(
        &root.join("app/build.gradle.kts"),
        "dependencies {\n    testImplementation(\"junit:junit\")\n}\n",
    );
    write(&root.join("gradle.properties"), "kotlin.code.style=official\n");

    Settings {
        scan_path: dir.to_path_buf(),
        parallel: false,
        show_progress: false,
        quiet: true,
        use_colors: false,
        ..Settings::default()
    }
}

#[test]
fn test_tables_from_scanned_project() -> Result<()> {
    let dir = tempdir().unwrap();
    let settings = create_project(dir.path());
    let results = Walker::new(settings).analyze()?;

    let dependencies = format_table_csv(&results, AnalysisKind::Dependencies)?;
    assert!(dependencies.contains("weather,com.android.tools.build,gradle,classpath,8.1.0"));
    assert!(dependencies.contains(&format!("weather,junit,junit,testImplementation,{MISSING}")));

    let modules = format_table_csv(&results, AnalysisKind::Modules)?;
    assert!(modules.contains("weather,app,com.jakewharton.timber,timber,implementation"));
    assert!(!modules.contains("weather,app,com.android.tools.build"));

    let plugins = format_table_csv(&results, AnalysisKind::Plugins)?;
    assert!(plugins.contains("weather,com.android.application,8.1.0,"));

    let tags = format_table_csv(&results, AnalysisKind::Tags)?;
    assert_eq!(tags, "project_name,tag\nweather,android\n");

    let properties = format_table_csv(&results, AnalysisKind::Properties)?;
    assert!(properties.ends_with("weather,kotlin.code.style,official\n"));
    Ok(())
}

#[test]
fn test_output_dir_receives_one_file_per_analysis() -> Result<()> {
    let dir = tempdir().unwrap();
    let reports = dir.path().join("reports");
    fs::create_dir_all(&reports).unwrap();
    let settings = Settings {
        exclude_patterns: vec!["reports".to_string()],
        analyses: vec![AnalysisKind::Tags, AnalysisKind::Properties],
        output_format: OutputFormat::Csv,
        output_dir: Some(reports.clone()),
        ..create_project(dir.path())
    };

    let results = analyze(&settings)?;
    emit(&results, &settings)?;

    let mut written: Vec<String> = fs::read_dir(&reports)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            AnalysisKind::Properties.table_file_name().to_string(),
            AnalysisKind::Tags.table_file_name().to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_missing_output_dir_is_reported() -> Result<()> {
    let dir = tempdir().unwrap();
    let settings = create_project(dir.path());
    let results = Walker::new(settings.clone()).analyze()?;

    let missing = dir.path().join("nope");
    let err = write_csv_tables(&results, &settings.analyses, &missing).unwrap_err();
    assert!(matches!(err, FactsError::OutputDirectoryNotFound { .. }));
    Ok(())
}

#[test]
fn test_json_carries_analysis_date() -> Result<()> {
    let dir = tempdir().unwrap();
    let settings = create_project(dir.path());
    let results = Walker::new(settings.clone()).analyze()?;

    let json = create_formatter(OutputFormat::Json, &settings).format(&results)?;
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let project = &parsed["projects"][0];
    assert_eq!(project["name"], "weather");
    assert!(project["analysis_date"].is_string());
    assert_eq!(project["module_dependencies"][":app"]["dependencies"].as_array().map(Vec::len), Some(2));
    assert_eq!(parsed["summary"]["android_projects"], 1);
    Ok(())
}
