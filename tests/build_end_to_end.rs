use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use webforge::{BuildOverrides, build_once};

type TestResult = Result<(), Box<dyn Error>>;

/// Lay out a two-layer project: `common` as the base and `club` overriding
/// one page, plus a couple of scripts to concatenate.
fn write_project(root: &Path) -> TestResult {
    let src = root.join("src");

    fs::create_dir_all(src.join("common/html"))?;
    fs::create_dir_all(src.join("common/js"))?;
    fs::create_dir_all(src.join("club/html"))?;

    fs::write(src.join("common/html/index.html"), "<p>common</p>")?;
    fs::write(src.join("common/html/about.html"), "<p>about</p>")?;
    fs::write(src.join("club/html/index.html"), "<p>club</p>")?;

    fs::write(src.join("common/js/a.js"), "a")?;
    fs::write(src.join("common/js/b.js"), "b")?;

    let config = format!(
        r#"
        src_dir = "{src}"
        build_dir = "{build}"
        target = "club"

        [targets.common]

        [targets.club]
        dependency = "common"

        [tasks.pages]
        globs = ["/html/*.html"]

        [[tasks.pages.actions]]
        action = "collate"

        [tasks.scripts]
        globs = ["/js/*.js"]

        [[tasks.scripts.actions]]
        action = "concat"
        options = {{ output = "/js/bundle.js" }}
        "#,
        src = src.display(),
        build = root.join("build").display(),
    );
    fs::write(root.join("Webforge.toml"), config)?;
    Ok(())
}

#[tokio::test]
async fn overlay_override_and_concat_produce_expected_build_tree() -> TestResult {
    let tmp = TempDir::new()?;
    write_project(tmp.path())?;

    let ctx = build_once(
        &tmp.path().join("Webforge.toml"),
        &BuildOverrides::default(),
    )
    .await?;

    let build = tmp.path().join("build");

    // The club layer overrides index.html; about.html passes through from
    // the common layer.
    assert_eq!(
        fs::read_to_string(build.join("html/index.html"))?,
        "<p>club</p>"
    );
    assert_eq!(
        fs::read_to_string(build.join("html/about.html"))?,
        "<p>about</p>"
    );

    // Concat joins in glob order with the default newline separator.
    assert_eq!(fs::read_to_string(build.join("js/bundle.js"))?, "a\nb");

    assert_eq!(ctx.chain, vec!["common".to_string(), "club".to_string()]);
    Ok(())
}

#[tokio::test]
async fn rebuilds_clear_the_build_directory_first() -> TestResult {
    let tmp = TempDir::new()?;
    write_project(tmp.path())?;
    let config_path = tmp.path().join("Webforge.toml");

    build_once(&config_path, &BuildOverrides::default()).await?;

    // A stray file from a previous run must not survive the next build.
    let stale = tmp.path().join("build/stale.txt");
    fs::write(&stale, "old")?;

    build_once(&config_path, &BuildOverrides::default()).await?;
    assert!(!stale.exists());
    Ok(())
}

#[tokio::test]
async fn target_override_selects_the_base_layer_only() -> TestResult {
    let tmp = TempDir::new()?;
    write_project(tmp.path())?;

    let overrides = BuildOverrides {
        target: Some("common".to_string()),
        zip: None,
    };
    build_once(&tmp.path().join("Webforge.toml"), &overrides).await?;

    assert_eq!(
        fs::read_to_string(tmp.path().join("build/html/index.html"))?,
        "<p>common</p>"
    );
    Ok(())
}
