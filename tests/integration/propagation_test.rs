use gradle_facts::error::{FactsError, Result};
use gradle_facts::gradle::{
    build_module_graph, discover_project, propagate_dependencies, ModuleDependencyIndex, ScriptDependencies,
};
use gradle_facts::models::config::Settings;
use gradle_facts::parsers::FileTreeProvider;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn coordinates(index: &ModuleDependencyIndex, module: &str) -> Vec<String> {
    let mut coordinates: Vec<String> = index[module].iter().map(|d| d.coordinate()).collect();
    coordinates.sort();
    coordinates
}

fn propagate(root: &Path) -> Result<(ModuleDependencyIndex, Vec<(PathBuf, FactsError)>)> {
    let settings = Settings::default();
    let provider = FileTreeProvider::new();
    let (project, _) = discover_project(root, &settings)?;
    let (declared, mut issues) = ScriptDependencies::collect(&project.modules, &provider)?;
    let (graph, skipped) = build_module_graph(&project.modules, &provider)?;
    issues.extend(skipped);
    let (index, propagation_issues) = propagate_dependencies(&graph, &declared)?;
    issues.extend(propagation_issues);
    Ok((index, issues))
}

#[test]
fn test_only_global_declarations_reach_included_modules() -> Result<()> {
    let dir = tempdir().unwrap();
    let root = dir.path().join(":");
    write(&root.join("settings.gradle.kts"), "include(\":b\")\n");
    write(
        &root.join("build.gradle.kts"),
        r#"
dependencies {
    implementation("x:x:1")
}
allprojects {
    dependencies {
        classpath("y:y:1")
    }
}
"#,
    );
    write(&root.join("b/build.gradle.kts"), "dependencies {\n    api(\"b:own:2\")\n}\n");

    let (index, issues) = propagate(&root)?;

    assert!(issues.is_empty(), "{issues:?}");
    assert_eq!(coordinates(&index, ":"), vec!["x:x", "y:y"]);
    assert_eq!(coordinates(&index, ":b"), vec!["b:own", "y:y"]);
    Ok(())
}

#[test]
fn test_global_declarations_pass_through_nested_settings() -> Result<()> {
    let dir = tempdir().unwrap();
    let root = dir.path().join(":");
    write(&root.join("settings.gradle"), "include ':a'\n");
    write(
        &root.join("build.gradle"),
        "allprojects {\n    dependencies {\n        implementation 'y:y:1'\n    }\n}\n",
    );
    write(&root.join("a/settings.gradle"), "include ':c'\n");
    write(
        &root.join("a/build.gradle"),
        "allprojects {\n    dependencies {\n        testImplementation 'z:z:1'\n    }\n}\n",
    );
    write(&root.join("a/c/build.gradle"), "dependencies {\n    implementation 'c:c:1'\n}\n");

    let (index, _) = propagate(&root)?;

    assert_eq!(coordinates(&index, ":a"), vec!["y:y", "z:z"]);
    assert_eq!(coordinates(&index, ":a:c"), vec!["c:c", "y:y", "z:z"]);
    Ok(())
}

#[test]
fn test_include_cycle_is_reported_and_resolved() -> Result<()> {
    let dir = tempdir().unwrap();
    let root = dir.path().join(":");
    write(&root.join("settings.gradle.kts"), "include(\":a\")\n");
    write(&root.join("build.gradle.kts"), "dependencies { implementation(\"r:r:1\") }\n");
    write(&root.join("a/settings.gradle.kts"), "include(\":demo\")\n");
    write(&root.join("a/build.gradle.kts"), "dependencies { implementation(\"a:a:1\") }\n");

    let (index, issues) = propagate(&root)?;

    assert_eq!(index.len(), 2);
    assert!(index[":a"].iter().any(|d| d.coordinate() == "a:a"));
    assert!(index[":"].iter().any(|d| d.coordinate() == "r:r"));
    assert!(issues
        .iter()
        .any(|(_, err)| matches!(err, FactsError::ModuleCycle { .. }) && !err.is_critical()));
    Ok(())
}

#[test]
fn test_unparsable_module_script_leaves_it_empty() -> Result<()> {
    let dir = tempdir().unwrap();
    let root = dir.path().join(":");
    write(&root.join("settings.gradle.kts"), "include(\":b\")\n");
    write(
        &root.join("build.gradle.kts"),
        "allprojects {\n    dependencies {\n        implementation(\"y:y:1\")\n    }\n}\n",
    );
    write(&root.join("b/build.gradle.kts"), "dependencies {\n");

    let (index, issues) = propagate(&root)?;

    assert_eq!(coordinates(&index, ":b"), vec!["y:y"]);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].0.ends_with("b/build.gradle.kts"));
    Ok(())
}

#[test]
fn test_modules_with_the_same_directory_name_are_kept_apart() -> Result<()> {
    let dir = tempdir().unwrap();
    let root = dir.path().join("demo");
    write(&root.join("settings.gradle"), "include ':core:api', ':feature:api'\n");
    write(
        &root.join("build.gradle"),
        "allprojects {\n    dependencies {\n        implementation 'r:shared:1'\n    }\n}\n",
    );
    write(&root.join("core/api/build.gradle"), "dependencies {\n    api 'c:core-only:1'\n}\n");
    write(&root.join("feature/api/build.gradle"), "dependencies {\n    api 'f:feature-only:1'\n}\n");

    let (index, issues) = propagate(&root)?;

    assert!(issues.is_empty(), "{issues:?}");
    assert_eq!(index.len(), 3);
    assert_eq!(coordinates(&index, ":core:api"), vec!["c:core-only", "r:shared"]);
    assert_eq!(coordinates(&index, ":feature:api"), vec!["f:feature-only", "r:shared"]);
    Ok(())
}
