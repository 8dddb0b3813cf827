use std::fs;
use std::path::Path;

use css_asset_url::asset_paths::PatternSet;
use css_asset_url::config::parse_option_sets;
use css_asset_url::{
  BasePath, Processor, ProcessorOptions, ProcessorSet, RewriteOptions, UrlError,
  rewrite_stylesheet,
};
use tempfile::tempdir;

fn write_file(path: &Path, contents: &[u8]) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn copies_hashed_assets_and_rewrites_stylesheet() {
  let dir = tempdir().unwrap();
  let vendor = dir.path().join("vendor");
  let theme = dir.path().join("theme");
  let dist = dir.path().join("dist");
  write_file(&vendor.join("img/logo.png"), b"logo");
  write_file(&theme.join("img/bg.jpg"), b"bg");

  let mut options = ProcessorOptions::named("copy");
  options.base_path = Some([vendor, theme].into_iter().collect::<BasePath>());
  options.assets_path = Some(dist.join("img"));
  options.use_hash = true;
  let processors = ProcessorSet::new(&[options]).unwrap();

  let css = ".a { background: url('img/logo.png'); }\n.b { background: url(img/bg.jpg); }\n";
  let rewrite = RewriteOptions {
    relative_to: Some(dist.clone()),
    ..RewriteOptions::default()
  };
  let outcome = rewrite_stylesheet(css, &processors, &rewrite).await;

  assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
  let copied: Vec<String> = fs::read_dir(dist.join("img"))
    .unwrap()
    .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  assert_eq!(copied.len(), 2);
  for name in &copied {
    assert!(outcome.css.contains(&format!("img/{name}")), "{name} missing from {}", outcome.css);
  }
  assert!(copied.iter().any(|name| name.starts_with("logo.") && name.ends_with(".png")));
  assert!(copied.iter().any(|name| name.starts_with("bg.") && name.ends_with(".jpg")));
}

#[tokio::test]
async fn json_option_sets_run_as_sequential_passes() {
  let dir = tempdir().unwrap();
  let assets = dir.path().join("assets");
  write_file(&assets.join("icon.svg"), b"<svg/>");

  let config = serde_json::json!([
    { "url": "inline", "basePath": assets.to_string_lossy() },
    { "url": "custom", "customPrefix": "/static/" }
  ]);
  let option_sets = parse_option_sets(&config.to_string()).unwrap();
  let processors = ProcessorSet::new(&option_sets).unwrap();

  let css = "a { b: url(icon.svg); c: url(https://example.com/x.png); }";
  let outcome = rewrite_stylesheet(css, &processors, &RewriteOptions::default()).await;

  assert!(outcome.warnings.is_empty());
  assert_eq!(
    outcome.css,
    "a { b: url(data:image/svg+xml;base64,PHN2Zy8+); c: url(https://example.com/x.png); }"
  );
}

#[tokio::test]
async fn rebases_from_source_to_destination_root() {
  let mut options = ProcessorOptions::named("rebase");
  options.from = Some("src/a/b.css".into());
  options.to = Some("dist".into());
  let processors = ProcessorSet::new(&[options]).unwrap();

  let css = "a { b: url(../img/x.png); c: url(vendor/y.png); }";
  let rewrite = RewriteOptions {
    ignore: PatternSet::new(&["^vendor/"]).unwrap(),
    ..RewriteOptions::default()
  };
  let outcome = rewrite_stylesheet(css, &processors, &rewrite).await;
  assert_eq!(outcome.css, "a { b: url(dist/img/x.png); c: url(vendor/y.png); }");
}

#[tokio::test]
async fn invalid_options_fail_before_touching_the_filesystem() {
  let dir = tempdir().unwrap();
  let dist = dir.path().join("never-created");

  let mut options = ProcessorOptions::named("copy");
  options.assets_path = Some(dist.clone());
  let err = Processor::new(&options).unwrap_err();

  assert!(matches!(err, UrlError::MissingRequiredOption { option: "basePath", .. }));
  assert!(!dist.exists());
}
