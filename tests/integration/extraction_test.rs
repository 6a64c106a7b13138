use gradle_facts::error::{FactsError, Result};
use gradle_facts::gradle::plugins::{PluginContext, PluginExtractor};
use gradle_facts::gradle::{extract_dependencies, extract_included_modules, extract_plugins, ConfigurationKind};
use gradle_facts::models::records::{DependencyRecord, PluginRecord};
use gradle_facts::models::syntax::SyntaxTree;
use gradle_facts::parsers::{PropertiesParser, ScriptParser};
use gradle_facts::gradle::extract_properties;

fn kotlin(src: &str) -> Result<SyntaxTree> {
    ScriptParser::kotlin()
        .parse(src)
        .map_err(|e| FactsError::parse_unavailable("build.gradle.kts", e.to_string()))
}

fn groovy(src: &str) -> Result<SyntaxTree> {
    ScriptParser::groovy()
        .parse(src)
        .map_err(|e| FactsError::parse_unavailable("build.gradle", e.to_string()))
}

fn only(records: impl IntoIterator<Item = DependencyRecord>) -> DependencyRecord {
    let records: Vec<_> = records.into_iter().collect();
    assert_eq!(records.len(), 1, "{records:?}");
    records.into_iter().next().unwrap()
}

#[test]
fn test_gson_declaration_yields_full_record() -> Result<()> {
    let tree = kotlin(
        r#"
dependencies {
    implementation("com.google.code.gson:gson:2.8.7")
}
"#,
    )?;
    let record = only(extract_dependencies(&tree)?);

    assert_eq!(record.group_id, "com.google.code.gson");
    assert_eq!(record.artifact_id, "gson");
    assert_eq!(record.version.as_deref(), Some("2.8.7"));
    assert_eq!(record.configuration, Some(ConfigurationKind::Implementation));
    assert!(!record.declared_globally);
    Ok(())
}

#[test]
fn test_allprojects_declaration_is_global() -> Result<()> {
    let tree = kotlin(
        r#"
allprojects {
    dependencies {
        implementation("com.google.code.gson:gson:2.8.7")
    }
}
"#,
    )?;
    assert!(only(extract_dependencies(&tree)?).declared_globally);
    Ok(())
}

#[test]
fn test_kotlin_shorthand_expands() -> Result<()> {
    let tree = kotlin(
        r#"
buildscript {
    dependencies {
        classpath(kotlin("gradle-plugin", "1.5.20"))
    }
}
"#,
    )?;
    let record = only(extract_dependencies(&tree)?);

    assert_eq!(record.group_id, "org.jetbrains.kotlin");
    assert_eq!(record.artifact_id, "kotlin-gradle-plugin");
    assert_eq!(record.version.as_deref(), Some("1.5.20"));
    assert_eq!(record.configuration, Some(ConfigurationKind::Classpath));
    Ok(())
}

#[test]
fn test_groovy_forms() -> Result<()> {
    let tree = groovy(
        r#"
dependencies {
    implementation 'com.squareup.okhttp3:okhttp:4.9.0'
    testImplementation group: 'junit', name: 'junit', version: '4.13'
    println 'not a dependency'
}
"#,
    )?;
    let mut records: Vec<_> = extract_dependencies(&tree)?.into_iter().collect();
    records.sort_by(|a, b| a.group_id.cmp(&b.group_id));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].coordinate(), "com.squareup.okhttp3:okhttp");
    assert_eq!(records[1].coordinate(), "junit:junit");
    assert_eq!(records[1].configuration, Some(ConfigurationKind::TestImplementation));
    assert_eq!(records[1].version.as_deref(), Some("4.13"));
    Ok(())
}

#[test]
fn test_unrelated_calls_yield_nothing() -> Result<()> {
    let tree = kotlin(
        r#"
dependencies {
    println("implementation(\"a:b:1\")")
    "implementation"
}
implementation("outside:block:1")
"#,
    )?;
    assert!(extract_dependencies(&tree)?.is_empty());
    Ok(())
}

#[test]
fn test_plugin_shorthand_wins_over_bare_identifier() {
    let context = PluginContext {
        in_plugins: true,
        in_apply: false,
    };
    let record = PluginExtractor::shared().extract(r#"kotlin("jvm") version "1.5.20""#, context);

    assert_eq!(
        record,
        Some(
            PluginRecord::new("org.jetbrains.kotlin.jvm")
                .with_version(Some("1.5.20".to_string()))
                .with_arg("jvm")
        )
    );
}

#[test]
fn test_plugins_from_both_styles() -> Result<()> {
    let tree = kotlin(
        r#"
plugins {
    java
    id("com.android.application") version "7.0.0" apply false
}
apply(plugin = "kotlin-android")
"#,
    )?;
    let plugins = extract_plugins(&tree)?;
    let mut ids: Vec<_> = plugins.iter().map(|p| p.plugin_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["com.android.application", "java", "kotlin-android"]);

    let android = plugins.iter().find(|p| p.plugin_id == "com.android.application").unwrap();
    assert_eq!(android.version.as_deref(), Some("7.0.0"));
    assert!(!android.applied);
    Ok(())
}

#[test]
fn test_version_catalog_aliases_are_not_bare_plugins() -> Result<()> {
    let kts = kotlin("plugins {\n    alias(libs.plugins.android.application)\n    java\n}\n")?;
    let ids: Vec<_> = extract_plugins(&kts)?.into_iter().map(|p| p.plugin_id).collect();
    assert_eq!(ids, vec!["java".to_string()]);

    let groovy = groovy("plugins {\n    alias libs.plugins.android.application\n    id 'java'\n}\n")?;
    let ids: Vec<_> = extract_plugins(&groovy)?.into_iter().map(|p| p.plugin_id).collect();
    assert_eq!(ids, vec!["java".to_string()]);
    Ok(())
}

#[test]
fn test_plugin_applied_in_allprojects_marks_declaration_global() -> Result<()> {
    let tree = kotlin(
        r#"
plugins {
    java
    id("org.jetbrains.intellij") version "1.1.3"
}
allprojects {
    apply {
        plugin("java")
    }
}
"#,
    )?;
    let plugins = extract_plugins(&tree)?;
    assert_eq!(plugins.len(), 2, "{plugins:?}");

    let java = plugins.iter().find(|p| p.plugin_id == "java").unwrap();
    assert!(java.declared_globally);
    let intellij = plugins.iter().find(|p| p.plugin_id == "org.jetbrains.intellij").unwrap();
    assert!(!intellij.declared_globally);
    Ok(())
}

#[test]
fn test_includes_keep_order_and_strip_leading_colon() -> Result<()> {
    let tree = groovy("include ':app', ':core:data'\ninclude 'feature'\nrootProject.name = 'demo'\n")?;
    assert_eq!(
        extract_included_modules(&tree)?,
        vec!["app".to_string(), "core:data".to_string(), "feature".to_string()]
    );
    Ok(())
}

#[test]
fn test_properties_in_file_order() -> Result<()> {
    let tree = PropertiesParser::parse("# comment\nandroid.useAndroidX=true\nkotlin.code.style: official\n");
    let properties = extract_properties(&tree)?;

    let pairs: Vec<_> = properties.iter().map(|p| (p.key.as_str(), p.value.as_str())).collect();
    assert_eq!(pairs, vec![("android.useAndroidX", "true"), ("kotlin.code.style", "official")]);
    Ok(())
}
