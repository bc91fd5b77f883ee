//! docweave CLI - OOXML package inspection tool
//!
//! A command-line front end over the docweave library: package structure,
//! relationships, effective styles, list markers and table geometry.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use docweave::{
    detect_flavor, CellGeometry, CoreProperties, Document, PackURI, Package, RelTarget, StyleKind,
    TableGrid,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Inspect Office Open XML packages
#[derive(Parser)]
#[command(
    name = "docweave",
    author = "iyulab",
    version,
    about = "Inspect Office Open XML packages",
    long_about = "docweave - OOXML package reader.\n\n\
                  Shows the part graph of any OPC package and resolves styles, \
                  list markers and merged table cells of Word documents."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show package flavor, metadata and part count
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// List every part with its content type and kind
    Parts {
        /// Input file path
        input: PathBuf,
    },

    /// List the relationships of a part (or of the package with "/")
    Rels {
        /// Input file path
        input: PathBuf,

        /// Source partname
        #[arg(default_value = "/")]
        source: String,
    },

    /// Print the effective properties of a style as JSON
    Style {
        /// Input file path
        input: PathBuf,

        /// Style id (e.g., "Heading1")
        id: String,

        /// Style kind
        #[arg(long, default_value = "paragraph")]
        kind: KindArg,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Print successive list markers of a numbering instance
    List {
        /// Input file path
        input: PathBuf,

        /// Numbering instance id (w:numId)
        num_id: u32,

        /// List level, 0-based
        level: u8,

        /// How many markers to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Show the merged-cell layout of every top-level table
    Tables {
        /// Input file path
        input: PathBuf,

        /// Column width for cell text
        #[arg(long, default_value = "16")]
        width: usize,
    },

    /// Write the part behind a main-document relationship id to a file
    Blob {
        /// Input file path
        input: PathBuf,

        /// Relationship id (e.g., "rId5")
        rel_id: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

/// Style kind
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl From<KindArg> for StyleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Paragraph => StyleKind::Paragraph,
            KindArg::Character => StyleKind::Character,
            KindArg::Table => StyleKind::Table,
            KindArg::Numbering => StyleKind::Numbering,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            let package = open_package(&input)?;
            let flavor = detect_flavor(&package)?;
            let metadata = CoreProperties::from_package(&package)?;

            println!("{}", "Package Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), flavor);
            println!("{}: {}", "Parts".bold(), package.part_count());

            let fields = [
                ("Title", &metadata.title),
                ("Subject", &metadata.subject),
                ("Author", &metadata.creator),
                ("Keywords", &metadata.keywords),
                ("Last modified by", &metadata.last_modified_by),
                ("Created", &metadata.created),
                ("Modified", &metadata.modified),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    println!("{}: {}", label.bold(), value);
                }
            }

            if flavor.is_wordprocessing() {
                let doc = Document::from_package(package)?;
                println!("\n{}", "Word Content".cyan().bold());
                println!("{}", "─".repeat(40));
                println!("{}: {}", "Styles".bold(), doc.styles().sheet().len());
                println!(
                    "{}: {}",
                    "Lists".bold(),
                    doc.numbering().definitions().instances.len()
                );
                println!("{}: {}", "Tables".bold(), doc.tables()?.len());
            }
        }

        Commands::Parts { input } => {
            let package = open_package(&input)?;
            for (_, part) in package.iter_parts() {
                println!(
                    "{:<40} {:<12} {:>3} rels  {}",
                    part.partname().to_string().bold(),
                    part.kind().name().green(),
                    part.rels().len(),
                    part.content_type().dimmed()
                );
            }
        }

        Commands::Rels { input, source } => {
            let package = open_package(&input)?;
            let source_id = if source == "/" {
                None
            } else {
                let partname = PackURI::new(source.as_str())?;
                let id = package
                    .part_by_name(&partname)
                    .ok_or_else(|| format!("no part named {}", partname))?;
                Some(id)
            };

            for rel in package.rels_of(source_id).iter() {
                let target = match rel.target() {
                    RelTarget::Internal(id) => package.part(*id).partname().to_string(),
                    RelTarget::External(url) => format!("{} {}", url, "(external)".yellow()),
                };
                let short_type = rel.reltype().rsplit('/').next().unwrap_or_default();
                println!("{:<8} {:<20} {}", rel.r_id().bold(), short_type.green(), target);
            }
        }

        Commands::Style {
            input,
            id,
            kind,
            compact,
        } => {
            let doc = open_document(&input)?;
            let resolved = doc.resolve_style(&id, kind.into())?;
            let json = if compact {
                resolved.to_json_compact()?
            } else {
                resolved.to_json()?
            };
            write_output(None, &json)?;
        }

        Commands::List {
            input,
            num_id,
            level,
            count,
        } => {
            let doc = open_document(&input)?;
            for _ in 0..count {
                println!("{}", doc.text_for(num_id, level)?);
            }
        }

        Commands::Tables { input, width } => {
            let doc = open_document(&input)?;
            let tables = doc.tables()?;
            if tables.is_empty() {
                println!("{} No tables found in document", "!".yellow().bold());
            }
            for (index, table) in tables.iter().enumerate() {
                let grid = TableGrid::from_table(table);
                let rows = table.rows();
                println!(
                    "{} {} ({} rows x {} columns)",
                    "Table".cyan().bold(),
                    index + 1,
                    grid.row_count(),
                    grid.column_count()
                );
                for geometry_row in grid.layout() {
                    let mut line = String::from("|");
                    for geometry in geometry_row {
                        let cell_text = match geometry {
                            CellGeometry::Origin {
                                row,
                                cell,
                                colspan,
                                rowspan,
                                ..
                            } => {
                                let text = rows[row].cells()[cell].text().replace('\n', " ");
                                if colspan > 1 || rowspan > 1 {
                                    format!("{} [{}x{}]", text, colspan, rowspan)
                                } else {
                                    text
                                }
                            }
                            CellGeometry::Continuation { .. } => "^".to_string(),
                        };
                        line.push(' ');
                        line.push_str(&fit(&cell_text, width));
                        line.push_str(" |");
                    }
                    println!("{}", line);
                }
                println!();
            }
        }

        Commands::Blob {
            input,
            rel_id,
            output,
        } => {
            let doc = open_document(&input)?;
            let data = doc.blob_for(&rel_id)?;
            fs::write(&output, data)?;
            println!(
                "{} Wrote {} bytes to {}",
                "✓".green().bold(),
                data.len(),
                output.display()
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn open_package(path: &Path) -> docweave::Result<Package> {
    let pb = create_spinner("Reading package...");
    let package = Package::open(path);
    pb.finish_and_clear();
    package
}

fn open_document(path: &Path) -> docweave::Result<Document> {
    Document::from_package(open_package(path)?)
}

/// Pad or truncate to a display width.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    if text.width() <= width {
        out.push_str(text);
    } else {
        let mut used = 0;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            // leave room for the ellipsis
            if used + w + 1 > width {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
    }
    let pad = width.saturating_sub(out.width());
    out.push_str(&" ".repeat(pad));
    out
}

fn print_version() {
    println!("{} {}", "docweave".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Office Open XML package reader");
    println!();
    println!("Packages: DOCX, XLSX, PPTX (structure); DOCX (styles, lists, tables)");
    println!("Repository: https://github.com/iyulab/docweave");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        // wide characters count double
        assert_eq!(fit("表格", 4), "表格");
        assert_eq!(fit("表格表", 5), "表格…");
    }

    #[test]
    fn test_style_args() {
        let cli = Cli::parse_from(["docweave", "style", "a.docx", "Heading1", "--kind", "table"]);
        match cli.command {
            Commands::Style { id, kind, .. } => {
                assert_eq!(id, "Heading1");
                assert_eq!(StyleKind::from(kind), StyleKind::Table);
            }
            _ => panic!("expected style command"),
        }
    }
}
