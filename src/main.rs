use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docuvault::config::AppConfig;
use docuvault::core::api::HttpDocumentApi;
use docuvault::core::events::LibraryEvent;
use docuvault::core::filter::FilterChange;
use docuvault::core::models::{Document, FileSelection};
use docuvault::core::Library;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Parser, Debug)]
#[command(name = "docuvault")]
#[command(about = "Document library client: list, search, upload and delete documents")]
#[command(version)]
struct Cli {
    /// API root, overriding the config file
    #[arg(long, global = true, env = docuvault::config::API_URL_ENV)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// List documents, optionally filtered by a search query
    List {
        /// Text matched against file names and keywords
        query: Option<String>,
        /// Only documents created on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Only documents of this type (PDF, Image, Document, Other)
        #[arg(long = "type")]
        type_label: Option<String>,
    },
    /// Show keyword statistics for a document
    Keywords {
        /// Document ID
        id: String,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
    /// Upload a file
    Upload {
        /// Path of the file to upload
        path: PathBuf,
    },
    /// Print the download link for a document
    Url {
        /// Document ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = docuvault::core::logging::init();
    tracing::info!("DocuVault v{} starting", docuvault::VERSION);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    let api = HttpDocumentApi::from_config(&config.api)?;
    let (mut library, mut events) = Library::new(api, &config.library);

    let command = cli.command.unwrap_or(Command::List {
        query: None,
        date: None,
        type_label: None,
    });

    match command {
        Command::List { query, date, type_label } => {
            library.load().await?;
            if date.is_some() || type_label.is_some() {
                library.on_filter_changed(FilterChange::new(
                    date.unwrap_or_default(),
                    type_label.unwrap_or_default(),
                ));
            }
            if let Some(query) = query {
                library.on_search(&query);
            }
            print_pages(&mut library);
        }
        Command::Keywords { id } => {
            let keywords = library.keyword_stats(&id).await?;
            if keywords.is_empty() {
                println!("No keywords for {id}");
            }
            for kw in keywords {
                println!("{:<32} {:>8.4} {:>7.1}%", kw.word, kw.count, kw.percent);
            }
        }
        Command::Delete { id } => {
            library.load().await?;
            library.on_delete_request(&id);
            drain(&mut events);
            library.on_delete_confirm().await?;
        }
        Command::Upload { path } => {
            let file = FileSelection::from_path(&path).await?;
            library.on_file_picked(Some(file));
            library.on_upload_submit().await?;
        }
        Command::Url { id } => println!("{}", library.download_url(&id)),
    }

    drain(&mut events);
    Ok(())
}

fn print_pages(library: &mut Library<HttpDocumentApi>) {
    let options = library.filter_options();
    if !options.dates.is_empty() {
        println!("dates: {}", options.dates.join(", "));
    }
    if !options.types.is_empty() {
        println!("types: {}", options.type_labels().join(", "));
    }

    loop {
        println!(
            "-- page {}/{} ({} documents) --",
            library.page_index() + 1,
            library.total_pages(),
            library.filtered().len()
        );
        for doc in library.page_documents() {
            print_document(doc);
        }
        if !library.page_next() {
            break;
        }
    }
}

fn print_document(doc: &Document) {
    let created = doc
        .created_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| doc.creation_date.clone());
    let size = doc
        .file_size
        .map(|s| format!("{s} B"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<36}  {:<40}  {:<10}  {:>12}  {}",
        doc.id,
        doc.file_name,
        doc.mime_label(),
        size,
        created
    );
}

fn drain(events: &mut UnboundedReceiver<LibraryEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            LibraryEvent::Notice(notice) => match notice.message {
                Some(message) => println!("[{:?}] {}: {}", notice.level, notice.title, message),
                None => println!("[{:?}] {}", notice.level, notice.title),
            },
            LibraryEvent::DeleteConfirmation { message } => println!("{message} (confirmed)"),
            LibraryEvent::UploadProgress { percent } => println!("upload: {percent}%"),
            LibraryEvent::Uploaded { file_name } => println!("uploaded {file_name}"),
            LibraryEvent::Deleted { id } => println!("deleted {id}"),
            LibraryEvent::Reloaded { count } => tracing::debug!(count, "reloaded"),
        }
    }
}
