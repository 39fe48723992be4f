//! Command-line front end: build courses from a manifest, crawl a single
//! course, inspect a sidebar menu, or generate the sitemap.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rs_courseware::catalog::Catalog;
use rs_courseware::discovery::menu_sections;
use rs_courseware::{
    build_all, build_course, sitemap, BuildSummary, CollisionPolicy, CourseManifest, CourseSpec,
    Discovery, Options,
};

#[derive(Parser)]
#[command(name = "courseware", about = "Extract tutorial pages into course curricula")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the courses declared in a manifest
    Build {
        /// Path to the course manifest (JSON)
        manifest: PathBuf,
        /// Only build these course ids (repeatable)
        #[arg(short, long = "course")]
        courses: Vec<String>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Build one course by following "Next" links from its entry page
    Crawl {
        /// Course source directory
        source_dir: PathBuf,
        /// Course id (destination prefix, curriculum file name)
        #[arg(long)]
        id: String,
        /// Course title (defaults to the id)
        #[arg(long)]
        title: Option<String>,
        /// Output root receiving content/, data/ and courses.json
        #[arg(short, long, default_value = "assets")]
        output: PathBuf,
        /// Entry page (default: index.html, then default.html)
        #[arg(long)]
        entry: Option<String>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print the sections parsed from a page's sidebar menu as JSON
    Menu {
        /// Page carrying the sidebar
        page: PathBuf,
    },
    /// Generate sitemap.xml from the catalog and curricula
    Sitemap {
        /// Output root holding courses.json and data/
        #[arg(short, long, default_value = "assets")]
        output: PathBuf,
        /// Public base URL of the site
        #[arg(long)]
        base_url: String,
        /// Sitemap destination
        #[arg(long, default_value = "sitemap.xml")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Maximum pages followed by the chain crawler
    #[arg(long, default_value = "200")]
    ceiling: usize,
    /// Keep the first image when two share a basename
    #[arg(long)]
    keep_first_images: bool,
    /// Rewrite highlighted code blocks into <pre><code>
    #[arg(long)]
    normalize_code: bool,
    /// Wrap tables in a responsive container
    #[arg(long)]
    wrap_tables: bool,
    /// Remove target attributes from links
    #[arg(long)]
    strip_link_targets: bool,
}

impl PipelineArgs {
    fn options(&self) -> Options {
        Options {
            crawl_ceiling: self.ceiling,
            collision_policy: if self.keep_first_images {
                CollisionPolicy::KeepFirst
            } else {
                CollisionPolicy::Overwrite
            },
            normalize_code_blocks: self.normalize_code,
            wrap_tables: self.wrap_tables,
            strip_link_targets: self.strip_link_targets,
            ..Options::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            courses,
            pipeline,
        } => {
            let manifest = CourseManifest::load(&manifest)
                .with_context(|| format!("loading manifest {}", manifest.display()))?;
            for id in &courses {
                if manifest.course(id).is_none() {
                    bail!("course {id:?} is not declared in the manifest");
                }
            }
            let summary = build_all(&manifest, &pipeline.options(), &courses);
            print_summary(&summary);
            if !summary.failed.is_empty() {
                bail!("{} course(s) failed", summary.failed.len());
            }
        }
        Commands::Crawl {
            source_dir,
            id,
            title,
            output,
            entry,
            pipeline,
        } => {
            let course = CourseSpec {
                title: title.unwrap_or_else(|| id.clone()),
                id,
                source_dir,
                scope: rs_courseware::AssetScope::Shared,
                discovery: Discovery::Chain { entry },
                meta: rs_courseware::catalog::CourseMeta::default(),
            };
            let manifest = CourseManifest {
                output_dir: output,
                public_root: "assets/content".to_string(),
                data_prefix: "assets/data".to_string(),
                shared_asset_dirs: Vec::new(),
                courses: vec![course],
            };
            manifest.validate()?;
            let report = build_course(&manifest, &manifest.courses[0], &pipeline.options())
                .with_context(|| format!("crawling {}", manifest.courses[0].source_dir.display()))?;
            println!(
                "Crawled {}: {} lessons ({:?})",
                report.course_id,
                report.curriculum.lesson_count(),
                report.crawl_stop
            );
        }
        Commands::Menu { page } => {
            let (dir, file) = split_page(&page)?;
            let sections = menu_sections(dir, &file)?;
            println!("{}", serde_json::to_string_pretty(&sections)?);
        }
        Commands::Sitemap {
            output,
            base_url,
            out,
        } => {
            let catalog = Catalog::load(&output.join("courses.json"))?;
            let today = chrono::Local::now().date_naive();
            let count = sitemap::write_sitemap(&out, &base_url, &catalog, &output.join("data"), today)?;
            println!(
                "Sitemap written to {} ({} courses, {} urls)",
                out.display(),
                catalog.entries().len(),
                count
            );
        }
    }

    eprintln!("Finished in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn split_page(page: &Path) -> anyhow::Result<(&Path, String)> {
    let file = page
        .file_name()
        .and_then(|f| f.to_str())
        .with_context(|| format!("not a page path: {}", page.display()))?;
    let dir = page.parent().unwrap_or_else(|| Path::new("."));
    Ok((dir, file.to_string()))
}

fn print_summary(summary: &BuildSummary) {
    for report in &summary.built {
        println!(
            "{:<16} {:>3} sections {:>4} lessons {:>4} images ({} unresolved, {} collisions)",
            report.course_id,
            report.curriculum.sections().len(),
            report.curriculum.lesson_count(),
            report.assets.rewritten,
            report.assets.unresolved,
            report.assets.collisions,
        );
    }
    for (id, err) in &summary.failed {
        println!("{id:<16} FAILED: {err}");
    }
}
