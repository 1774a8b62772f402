// ABOUTME: Main entry point for the deck editor.
// ABOUTME: Provides a CLI that edits deck files and drives the remote slide service.

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use deck_editor::{
    export, outline, Config, DesignKey, DesignPatch, Detail, EditingSession,
    ExportFormat, GenerateRequest, NewSlide, RemoteClient,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log progress information
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the slide service (overrides DECK_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Request timeout in milliseconds (overrides DECK_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deck from a topic or an uploaded document
    Generate(GenerateArgs),

    /// Fetch a saved presentation into a deck file
    Fetch {
        presentation_id: String,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Save a deck file back to the service
    Save {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Delete a presentation on the service
    Delete { presentation_id: String },

    /// Export a deck file to pptx, pdf, md or json
    Export(ExportArgs),

    /// Import a Markdown outline into a deck file
    ImportMd {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Theme applied to every imported slide
        #[arg(long)]
        theme: Option<String>,
    },

    /// Print a summary of a deck file
    Show {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Edit a deck file
    Edit(EditArgs),

    /// Generate an image, optionally attaching it to a deck's current slide
    Image {
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Manage the image gallery
    #[command(subcommand)]
    Images(ImageCommands),

    /// Manage folders
    #[command(subcommand)]
    Folder(FolderCommands),
}

#[derive(Args)]
struct GenerateArgs {
    /// Topic to build the outline from
    #[arg(short, long, conflicts_with = "document", required_unless_present = "document")]
    topic: Option<String>,

    /// Id of an uploaded document to build the outline from
    #[arg(short, long)]
    document: Option<String>,

    /// brief, medium or deep
    #[arg(long)]
    detail: Option<Detail>,

    /// Theme id
    #[arg(long)]
    style: Option<String>,

    /// Number of slides to request
    #[arg(long)]
    slides: Option<u32>,

    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long, default_value = "pptx")]
    format: ExportFormat,

    /// Output directory (overrides DECK_EXPORT_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Render md/json locally instead of calling the service
    #[arg(long)]
    offline: bool,
}

/// Structural changes run first, then selection, then field edits.
#[derive(Args)]
struct EditArgs {
    #[arg(short, long)]
    input: PathBuf,

    /// Write the result here instead of back to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append a new slide (and select it)
    #[arg(long)]
    add_slide: bool,

    /// Duplicate the slide at this index
    #[arg(long)]
    duplicate: Option<usize>,

    /// Delete the slide at this index
    #[arg(long)]
    delete: Option<usize>,

    /// Select the slide at this index
    #[arg(long)]
    select: Option<usize>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    heading: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    /// Append an empty bullet
    #[arg(long)]
    add_bullet: bool,

    /// Replace a bullet, as INDEX=TEXT
    #[arg(long = "set-bullet", value_parser = parse_bullet)]
    set_bullets: Vec<(usize, String)>,

    /// Remove the bullet at this index
    #[arg(long)]
    remove_bullet: Option<usize>,

    /// Set a design key, as KEY=VALUE
    #[arg(long = "design", value_parser = parse_design)]
    design: Vec<(DesignKey, String)>,

    /// Clear a design key
    #[arg(long = "clear-design")]
    clear_design: Vec<DesignKey>,
}

#[derive(Subcommand)]
enum ImageCommands {
    /// List generated images
    List,
    /// Delete a generated image
    Delete { image_id: String },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Create a folder
    Create { name: String },
    /// List folders
    List,
    /// Add a presentation to a folder
    Add {
        folder_id: String,
        presentation_id: String,
    },
    /// List the presentations in a folder
    Presentations { folder_id: String },
    /// Delete a folder
    Delete { folder_id: String },
}

fn parse_bullet(s: &str) -> Result<(usize, String), String> {
    let (index, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TEXT, got {:?}", s))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid bullet index {:?}: {}", index, e))?;
    Ok((index, text.to_string()))
}

fn parse_design(s: &str) -> Result<(DesignKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))?;
    let key = key.trim().parse::<DesignKey>().map_err(|e| e.to_string())?;
    Ok((key, value.to_string()))
}

fn connect(cli: &Cli, config: &Config) -> anyhow::Result<RemoteClient> {
    let mut config = config.clone();
    if let Some(base) = &cli.api_base {
        config.api_base = base.clone();
    }
    let client_config = config.client_config(cli.timeout_ms)?;
    Ok(RemoteClient::new(&client_config)?)
}

fn apply_edits(session: &mut EditingSession, args: &EditArgs) -> deck_editor::Result<()> {
    let editor = session.editor_mut();

    if args.add_slide {
        editor.add_slide(Some(NewSlide::default()));
    }
    if let Some(index) = args.duplicate {
        editor.duplicate_slide(index)?;
    }
    if let Some(index) = args.delete {
        editor.delete_slide(index)?;
    }
    if let Some(index) = args.select {
        editor.select(index)?;
    }

    if let Some(title) = &args.title {
        editor.update_title(title);
    }
    if let Some(heading) = &args.heading {
        editor.update_heading(heading);
    }
    if let Some(notes) = &args.notes {
        editor.update_notes(notes);
    }
    if args.add_bullet {
        editor.add_bullet();
    }
    for (index, text) in &args.set_bullets {
        editor.update_bullet(*index, text)?;
    }
    if let Some(index) = args.remove_bullet {
        editor.remove_bullet(index)?;
    }

    let mut patch = DesignPatch::new();
    for (key, value) in &args.design {
        patch = patch.set(*key, Some(value.clone()));
    }
    for key in &args.clear_design {
        patch = patch.clear(*key);
    }
    if !patch.is_empty() {
        editor.update_design(&patch);
    }

    Ok(())
}

fn print_deck(session: &EditingSession) {
    let editor = session.editor();
    println!(
        "{} [{}] theme={} slides={}",
        if session.title().is_empty() {
            "(untitled)"
        } else {
            session.title()
        },
        session.presentation_id().unwrap_or("unsaved"),
        session.theme(),
        editor.len()
    );
    for (i, slide) in editor.slides().iter().enumerate() {
        let marker = if editor.current_index() == Some(i) {
            '*'
        } else {
            ' '
        };
        println!("{} {:>2}. {}", marker, i, slide.display_heading());
        for bullet in &slide.bullets {
            println!("       - {}", bullet);
        }
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        println!("No command specified. Use --help for usage information.");
        return Ok(());
    };

    match command {
        Commands::Generate(args) => {
            let client = connect(cli, config)?;
            let style = args
                .style
                .clone()
                .unwrap_or_else(|| config.default_theme.clone());
            let request = match (&args.topic, &args.document) {
                (_, Some(document_id)) => GenerateRequest::document(document_id.clone(), style),
                (Some(topic), None) => GenerateRequest::Topic {
                    topic: topic.clone(),
                    detail: args.detail.unwrap_or(config.default_detail),
                    style,
                    num_slides: args.slides,
                },
                (None, None) => return Err(anyhow!("either --topic or --document is required")),
            };

            let mut session = EditingSession::new();
            session.generate(&client, &request)?;
            session.write_document(&args.output)?;
            println!(
                "Generated {} slides: {:?}",
                session.editor().len(),
                args.output
            );
        }
        Commands::Fetch {
            presentation_id,
            output,
        } => {
            let client = connect(cli, config)?;
            let mut session = EditingSession::new();
            session.resume(&client, presentation_id)?;
            session.write_document(output)?;
            println!("Fetched {} slides: {:?}", session.editor().len(), output);
        }
        Commands::Save { input } => {
            let client = connect(cli, config)?;
            let session = EditingSession::read_document(input)?;
            if session.save(&client)? {
                println!("Saved presentation {}", session.presentation_id().unwrap_or(""));
            } else {
                return Err(anyhow!("service did not confirm the save"));
            }
        }
        Commands::Delete { presentation_id } => {
            let client = connect(cli, config)?;
            client.delete_presentation(presentation_id)?;
            println!("Deleted presentation {}", presentation_id);
        }
        Commands::Export(args) => {
            let session = EditingSession::read_document(&args.input)?;
            let topic = session.export_topic();
            let bytes = if args.offline {
                export::render_offline(topic, session.editor().slides(), args.format)?
            } else {
                let client = connect(cli, config)?;
                session.export(&client, args.format)?
            };
            let dir = args.dir.clone().unwrap_or_else(|| config.export_dir.clone());
            let path = export::save_export(&bytes, &dir, topic, args.format)?;
            println!("Exported {}: {:?}", args.format, path);
        }
        Commands::ImportMd {
            input,
            output,
            theme,
        } => {
            let outline = outline::parse_outline_file(input)?;
            let theme = theme.clone().unwrap_or_else(|| config.default_theme.clone());
            let slides = outline
                .slides
                .into_iter()
                .map(|mut slide| {
                    if slide.design.theme.is_none() {
                        slide.design.theme = Some(theme.clone());
                    }
                    slide
                })
                .collect::<Vec<_>>();

            let mut session = EditingSession::new();
            let ticket = session.begin_load();
            if !session.finish_load(ticket, None, outline.title, slides) {
                return Err(anyhow!("outline import was superseded"));
            }
            session.set_theme(theme);
            session.write_document(output)?;
            println!(
                "Imported {} slides: {:?}",
                session.editor().len(),
                output
            );
        }
        Commands::Show { input } => {
            let session = EditingSession::read_document(input)?;
            print_deck(&session);
        }
        Commands::Edit(args) => {
            let mut session = EditingSession::read_document(&args.input)?;
            apply_edits(&mut session, args)?;
            let output = args.output.as_ref().unwrap_or(&args.input);
            session.write_document(output)?;
            print_deck(&session);
        }
        Commands::Image { prompt, input } => {
            let client = connect(cli, config)?;
            match input {
                Some(path) => {
                    let mut session = EditingSession::read_document(path)?;
                    let image = session.attach_image(&client, prompt)?;
                    session.write_document(path)?;
                    println!("Attached image {} ({})", image.id, image.url);
                }
                None => {
                    let image = client.generate_image(prompt, None)?;
                    println!("{}\t{}", image.id, image.url);
                }
            }
        }
        Commands::Images(command) => {
            let client = connect(cli, config)?;
            match command {
                ImageCommands::List => {
                    for image in client.list_images()? {
                        println!(
                            "{}\t{}\t{}\t{}",
                            image.id,
                            image.created_at.format("%Y-%m-%d %H:%M"),
                            image.url,
                            image.prompt
                        );
                    }
                }
                ImageCommands::Delete { image_id } => {
                    client.delete_image(image_id)?;
                    println!("Deleted image {}", image_id);
                }
            }
        }
        Commands::Folder(command) => {
            let client = connect(cli, config)?;
            match command {
                FolderCommands::Create { name } => {
                    let folder = client.create_folder(name)?;
                    println!("{}\t{}", folder.id, folder.name);
                }
                FolderCommands::List => {
                    for folder in client.list_folders()? {
                        println!(
                            "{}\t{}\t{} presentations",
                            folder.id,
                            folder.name,
                            folder.presentations.len()
                        );
                    }
                }
                FolderCommands::Add {
                    folder_id,
                    presentation_id,
                } => {
                    client.assign_to_folder(folder_id, presentation_id)?;
                    println!("Added {} to folder {}", presentation_id, folder_id);
                }
                FolderCommands::Presentations { folder_id } => {
                    for id in client.folder_presentations(folder_id)? {
                        println!("{}", id);
                    }
                }
                FolderCommands::Delete { folder_id } => {
                    client.delete_folder(folder_id)?;
                    println!("Deleted folder {}", folder_id);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = Config::from_env();

    if let Err(e) = run(&cli, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
