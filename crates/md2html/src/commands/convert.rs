//! `md2html` conversion command implementation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use md2html_config::{CliSettings, Config, CustomConfig, S3Config};
use md2html_renderer::{Converter, PageOptions, RenderOptions};
use md2html_s3::{S3Settings, S3Uploader};
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for converting markdown files.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown files to convert.
    files: Vec<PathBuf>,

    /// Markdown file to convert (alternative to positional files).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: config.json next to the executable).
    #[arg(short, long, env = "MD2HTML_CONFIG")]
    config: Option<PathBuf>,

    /// Write HTML files without uploading them.
    #[arg(long)]
    no_upload: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// A page written to the output directory.
#[derive(Debug)]
struct ConvertedPage {
    output_path: PathBuf,
    file_name: String,
    html: String,
}

impl ConvertArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let inputs = self.inputs()?;

        let cli_settings = CliSettings {
            output_dir: self.output.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }

        fs::create_dir_all(&config.output_dir)
            .map_err(|e| CliError::file(&config.output_dir, e))?;

        let converter = converter_for(&config);
        let pages = inputs
            .par_iter()
            .map(|input| convert_file(&converter, input, &config.output_dir))
            .collect::<Result<Vec<_>, _>>()?;

        for page in &pages {
            output.success(&format!("Saved: {}", page.output_path.display()));
        }

        if self.no_upload {
            output.warning("Upload skipped (--no-upload)");
            return Ok(());
        }
        let Some(s3) = &config.s3 else {
            output.warning("Upload skipped: no s3 section in config");
            return Ok(());
        };

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(upload_pages(
            upload_settings(s3, &config.custom),
            &pages,
            &output,
        ))
    }

    /// Positional files followed by `--input`.
    fn inputs(&self) -> Result<Vec<PathBuf>, CliError> {
        let inputs: Vec<PathBuf> = self
            .files
            .iter()
            .chain(self.input.as_ref())
            .cloned()
            .collect();
        if inputs.is_empty() {
            return Err(CliError::Validation(
                "No input files given (pass FILE... or --input FILE)".to_owned(),
            ));
        }

        // Pages are written in parallel, so output names must not collide
        let mut stems = HashSet::new();
        for input in &inputs {
            if let Some(stem) = input.file_stem()
                && !stems.insert(stem)
            {
                return Err(CliError::Validation(format!(
                    "Duplicate output name: {}.html",
                    stem.to_string_lossy()
                )));
            }
        }
        Ok(inputs)
    }
}

/// Build the converter from the `render` and `page` config sections.
fn converter_for(config: &Config) -> Converter {
    Converter::new(RenderOptions {
        gfm: config.render.gfm,
        smart_punctuation: config.render.smart_punctuation,
        heading_attributes: config.render.heading_attributes,
    })
    .with_page_options(PageOptions {
        highlight_version: config.page.highlight_version.clone(),
        highlight_theme: config.page.highlight_theme.clone(),
    })
}

fn upload_settings(s3: &S3Config, custom: &CustomConfig) -> S3Settings {
    S3Settings {
        endpoint: s3.endpoint.clone(),
        port: s3.port,
        bucket: s3.bucket.clone(),
        access_key: s3.access_key.clone(),
        secret_key: s3.secret_key.clone(),
        region: s3.region.clone(),
        use_ssl: s3.use_ssl,
        base_url: custom.base_url.clone(),
        path: custom.path.clone(),
    }
}

/// Convert one markdown file into `<output_dir>/<stem>.html`.
fn convert_file(
    converter: &Converter,
    input: &Path,
    output_dir: &Path,
) -> Result<ConvertedPage, CliError> {
    let markdown = fs::read_to_string(input).map_err(|e| CliError::file(input, e))?;
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Validation(format!("Not a file: {}", input.display())))?;

    let html = converter.render_document(&markdown, &stem);
    let file_name = format!("{stem}.html");
    let output_path = output_dir.join(&file_name);
    fs::write(&output_path, &html).map_err(|e| CliError::file(&output_path, e))?;

    tracing::info!(
        input = %input.display(),
        output = %output_path.display(),
        "Converted"
    );

    Ok(ConvertedPage {
        output_path,
        file_name,
        html,
    })
}

/// Upload pages in input order, printing each public URL.
async fn upload_pages(
    settings: S3Settings,
    pages: &[ConvertedPage],
    output: &Output,
) -> Result<(), CliError> {
    output.info(&format!(
        "Uploading to {} (bucket {})",
        settings.endpoint_url(),
        settings.bucket
    ));
    let uploader = S3Uploader::connect(settings).await;

    for page in pages {
        let object = uploader
            .upload(&page.file_name, page.html.as_bytes().to_vec())
            .await?;
        output.highlight(&format!("URL: {}", object.url));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ConvertArgs,
    }

    fn parse(argv: &[&str]) -> ConvertArgs {
        TestCli::try_parse_from(std::iter::once("md2html").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_inputs_positional_then_flag() {
        let args = parse(&["a.md", "b.md", "--input", "c.md"]);
        assert_eq!(
            args.inputs().unwrap(),
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("b.md"),
                PathBuf::from("c.md")
            ]
        );
    }

    #[test]
    fn test_inputs_required() {
        let args = parse(&["--no-upload"]);
        assert!(matches!(args.inputs(), Err(CliError::Validation(_))));
    }

    #[test]
    fn test_inputs_reject_duplicate_stems() {
        let args = parse(&["docs/readme.md", "notes/readme.md"]);
        let err = args.inputs().unwrap_err();
        assert!(err.to_string().contains("readme.html"));
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-i", "doc.md", "-o", "out", "-c", "cfg.json", "-v"]);
        assert_eq!(args.input, Some(PathBuf::from("doc.md")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.config, Some(PathBuf::from("cfg.json")));
        assert!(args.verbose);
        assert!(!args.no_upload);
    }

    #[test]
    fn test_convert_file_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n\n| a | b |\n|---|--:|\n| 1 | 2 |\n").unwrap();

        let page = convert_file(&Converter::default(), &input, dir.path()).unwrap();

        assert_eq!(page.file_name, "notes.html");
        assert_eq!(page.output_path, dir.path().join("notes.html"));
        let written = fs::read_to_string(&page.output_path).unwrap();
        assert_eq!(written, page.html);
        assert!(written.contains("<title>notes</title>"));
        assert!(written.contains("<h1>Notes</h1>"));
        assert!(written.contains(r#"<th align="right">b</th>"#));
    }

    #[test]
    fn test_convert_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.md");

        let err = convert_file(&Converter::default(), &input, dir.path()).unwrap_err();
        assert!(matches!(err, CliError::File { .. }));
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn test_execute_without_upload() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{
                "s3": {"endpoint": "minio.local", "port": 9000, "bucket": "docs",
                       "accessKey": "a", "secretKey": "s"},
                "custom": {"outputDir": "html"}
            }"#,
        )
        .unwrap();
        let first = dir.path().join("first.md");
        let second = dir.path().join("second.md");
        fs::write(&first, "```\ncode\n```").unwrap();
        fs::write(&second, "> quote").unwrap();

        let args = parse(&[
            first.to_str().unwrap(),
            "--input",
            second.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
            "--no-upload",
        ]);
        args.execute().unwrap();

        let first_html = fs::read_to_string(dir.path().join("html/first.html")).unwrap();
        assert!(first_html.contains("<pre><code>code</code></pre>"));
        let second_html = fs::read_to_string(dir.path().join("html/second.html")).unwrap();
        assert!(second_html.contains("<blockquote>"));
    }

    #[test]
    fn test_execute_without_s3_section() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("md2html.toml");
        fs::write(&config_path, "[page]\nhighlightTheme = \"github\"\n").unwrap();
        let input = dir.path().join("page.md");
        fs::write(&input, "text").unwrap();

        let args = parse(&[
            input.to_str().unwrap(),
            "-c",
            config_path.to_str().unwrap(),
        ]);
        args.execute().unwrap();

        let html = fs::read_to_string(dir.path().join("output/page.html")).unwrap();
        assert!(html.contains("github.min.css"));
    }

    #[test]
    fn test_upload_settings_maps_config() {
        let config: Config = load_config(
            r#"{
                "s3": {"endpoint": "https://minio.local", "port": 443, "bucket": "docs",
                       "accessKey": "a", "secretKey": "s", "useSSL": true},
                "custom": {"baseUrl": "https://cdn.example.com", "path": "/p"}
            }"#,
        );
        let settings = upload_settings(config.s3.as_ref().unwrap(), &config.custom);
        assert_eq!(settings.endpoint_url(), "https://minio.local:443");
        assert_eq!(
            settings.public_url("2024/01/x.html"),
            "https://cdn.example.com/p/2024/01/x.html"
        );
    }

    fn load_config(json: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, json).unwrap();
        Config::load(Some(path.as_path()), None).unwrap()
    }
}
