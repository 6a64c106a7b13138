use gradle_facts::cli::exit_code;
use gradle_facts::core::{ParallelWalker, Walker};
use gradle_facts::error::{ErrorSeverity, Result};
use gradle_facts::models::config::Settings;
use gradle_facts::models::records::ProjectTag;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan_settings(path: &Path) -> Settings {
    Settings {
        scan_path: path.to_path_buf(),
        parallel: false,
        show_progress: false,
        quiet: true,
        ..Settings::default()
    }
}

/// An Android project with one app module, a plain JVM library and a
/// directory that only holds a broken script
fn create_workspace(dir: &Path) {
    let android = dir.join("photos");
    write(
        &android.join("build.gradle"),
        r#"
buildscript {
    repositories {
        google()
    }
    dependencies {
        classpath 'com.android.tools.build:gradle:8.1.0'
    }
}
"#,
    );
    write(&android.join("settings.gradle"), "include ':app'\n");
    write(
        &android.join("app/build.gradle"),
        "plugins {\n    id 'com.android.application'\n}\ndependencies {\n    implementation 'androidx.core:core-ktx:1.12.0'\n}\n",
    );
    write(&android.join("gradle.properties"), "android.useAndroidX=true\n");
    write(&android.join("app/build/generated/build.gradle"), "dependencies {\n");

    let library = dir.join("ledger");
    write(
        &library.join("build.gradle.kts"),
        "plugins {\n    kotlin(\"jvm\") version \"1.9.0\"\n}\ndependencies {\n    implementation(\"com.squareup.okio:okio:3.6.0\")\n}\n",
    );

    write(&dir.join("broken/build.gradle.kts"), "dependencies {\n");
}

#[test]
fn test_scan_classifies_every_project() -> Result<()> {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());

    let results = Walker::new(scan_settings(dir.path())).analyze()?;

    let names: Vec<&str> = results.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["broken", "ledger", "photos"]);
    assert_eq!(results.summary.total_projects, 3);
    assert_eq!(results.summary.android_projects, 1);

    let photos = &results.projects[2];
    assert_eq!(photos.tags, vec![ProjectTag::Android]);
    assert_eq!(photos.module_count, 2);
    assert!(photos.module_dependencies.contains_key(":app"));
    assert_eq!(photos.properties.len(), 1);

    let ledger = &results.projects[1];
    assert_eq!(ledger.tags, vec![ProjectTag::Other]);
    assert_eq!(ledger.dependencies[0].coordinate(), "com.squareup.okio:okio");
    Ok(())
}

#[test]
fn test_unparsable_script_is_a_warning() -> Result<()> {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());

    let results = Walker::new(scan_settings(dir.path())).analyze()?;

    // the script under app/build is excluded by the default patterns
    assert_eq!(results.errors.len(), 1);
    assert!(results.errors[0].path.ends_with("broken/build.gradle.kts"));
    assert_eq!(results.worst_severity(), Some(ErrorSeverity::Warning));
    assert_eq!(results.summary.warnings_count, 1);
    assert_eq!(exit_code(results.worst_severity()), 0);
    Ok(())
}

#[test]
fn test_single_project_scan() -> Result<()> {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    let settings = Settings {
        single_project: true,
        ..scan_settings(&dir.path().join("photos"))
    };

    let results = Walker::new(settings).analyze()?;

    assert_eq!(results.projects.len(), 1);
    assert_eq!(results.projects[0].name, "photos");
    assert!(results.errors.is_empty());
    Ok(())
}

#[test]
fn test_excluded_project_is_not_scanned() -> Result<()> {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    let mut settings = scan_settings(dir.path());
    settings.exclude_patterns.push("broken".to_string());

    let results = Walker::new(settings).analyze()?;

    assert_eq!(results.projects.len(), 2);
    assert_eq!(results.worst_severity(), None);
    Ok(())
}

#[test]
fn test_parallel_scan_matches_sequential() -> Result<()> {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    let settings = scan_settings(dir.path());

    let sequential = Walker::new(settings.clone()).analyze()?;
    let parallel = ParallelWalker::new(Settings {
        parallel: true,
        threads: Some(2),
        ..settings
    })
    .analyze()?;

    assert_eq!(sequential.projects.len(), parallel.projects.len());
    for (a, b) in sequential.projects.iter().zip(&parallel.projects) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.dependencies, b.dependencies);
        assert_eq!(a.module_dependencies, b.module_dependencies);
        assert_eq!(a.plugins, b.plugins);
        assert_eq!(a.tags, b.tags);
    }
    assert_eq!(sequential.summary.configuration_usage, parallel.summary.configuration_usage);
    assert_eq!(sequential.errors.len(), parallel.errors.len());
    Ok(())
}

#[test]
fn test_missing_scan_path_fails() {
    let dir = tempdir().unwrap();
    let result = Walker::new(scan_settings(&dir.path().join("nowhere"))).analyze();
    assert!(result.is_err());
}
