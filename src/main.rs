use clap::Parser;
use notepad::application::{
    export, init, CancelToken, CategoryService, ConfigService, ExportManager, ImportManager,
    NoteChanges, NoteService,
};
use notepad::cli::{
    format_category_list, format_note_detail, format_note_list, CategoryCommand, Cli, Commands,
};
use notepad::domain::now_millis;
use notepad::error::NotepadError;
use notepad::infrastructure::logging::init_tracing;
use notepad::infrastructure::{FileSystemRepository, NoteQuery, NotebookRepository, SqliteStore};
use std::io::Write;
use std::sync::Arc;

fn main() {
    let cli = Cli::parse();

    // Configured level when a notebook is reachable; RUST_LOG always wins
    let level = FileSystemRepository::discover()
        .and_then(|repo| repo.load_config())
        .map(|config| config.log_level)
        .unwrap_or_else(|_| "warn".to_string());
    init_tracing(&level);

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("{}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Print a percentage line to stderr, overwriting the previous one
fn show_progress(label: &str, percent: u8) {
    eprint!("\r{} {:>3}%", label, percent);
    let _ = std::io::stderr().flush();
    if percent == 100 {
        eprintln!();
    }
}

fn run(cli: Cli) -> Result<(), NotepadError> {
    match cli.command {
        Commands::Init { path } => {
            init::init(&path)?;
            println!("Initialized notepad at {}", path.display());
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                let config = service.list()?;
                println!("export_dir = {}", config.export_dir);
                println!("log_level = {}", config.log_level);
                println!("created = {}", config.created.to_rfc3339());
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: notepad config [--list | <key> [<value>]]");
                println!("Valid keys: export_dir, log_level, created");
            }
            Ok(())
        }
        Commands::Add {
            title,
            content,
            category,
        } => {
            let service = NoteService::new(open_store()?);
            let note = service.add(&title, &content, category)?;
            println!("Created note {}", note.id);
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            content,
            category,
        } => {
            let service = NoteService::new(open_store()?);
            service.edit(
                id,
                NoteChanges {
                    title,
                    content,
                    category_id: category,
                },
            )?;
            println!("Updated note {}", id);
            Ok(())
        }
        Commands::Show { id } => {
            let service = NoteService::new(open_store()?);
            print!("{}", format_note_detail(&service.show(id)?));
            Ok(())
        }
        Commands::Delete { id } => {
            let service = NoteService::new(open_store()?);
            service.delete(id)?;
            println!("Deleted note {}", id);
            Ok(())
        }
        Commands::List { search, category } => {
            let service = NoteService::new(open_store()?);
            let query = NoteQuery {
                search,
                category_id: category,
            };
            let notes = service.list(&query)?;
            let output = format_note_list(&notes);
            if notes.is_empty() {
                println!("{}", output);
            } else {
                print!("{}", output);
            }
            Ok(())
        }
        Commands::Category(command) => run_category(command),
        Commands::Export { file, dir } => {
            let repo = FileSystemRepository::discover()?;
            let config = repo.load_config()?;
            let dir = match dir {
                Some(dir) => dir,
                None => config.export_dir_in(repo.root()),
            };
            let path = export::resolve_destination(&dir, file.as_deref(), now_millis())?;

            let manager = Arc::new(ExportManager::new(Arc::new(repo.open_store()?)));
            let summary = manager
                .spawn_export(path, CancelToken::new())
                .wait(|p| show_progress("Exporting", p))?;

            eprintln!("Exported {} notes", summary.note_count);
            println!("{}", summary.path.display());
            Ok(())
        }
        Commands::Import { file } => {
            let manager = Arc::new(ImportManager::new(open_store()?));
            let summary = manager
                .spawn_import(file, CancelToken::new())
                .wait(|p| show_progress("Importing", p))?;

            println!(
                "Imported {} notes ({} new, {} updated)",
                summary.processed, summary.inserted, summary.updated
            );
            Ok(())
        }
    }
}

fn run_category(command: CategoryCommand) -> Result<(), NotepadError> {
    let service = CategoryService::new(open_store()?);

    match command {
        CategoryCommand::Add { name } => {
            let category = service.add(&name)?;
            println!("Created category {} ({})", category.id, category.name);
        }
        CategoryCommand::Rename { id, name } => {
            let category = service.rename(id, &name)?;
            println!("Renamed category {} to {}", id, category.name);
        }
        CategoryCommand::Delete { id } => {
            service.delete(id)?;
            println!("Deleted category {}", id);
        }
        CategoryCommand::List => {
            let categories = service.list()?;
            let output = format_category_list(&categories);
            if categories.is_empty() {
                println!("{}", output);
            } else {
                print!("{}", output);
            }
        }
    }
    Ok(())
}

fn open_store() -> Result<Arc<SqliteStore>, NotepadError> {
    let repo = FileSystemRepository::discover()?;
    Ok(Arc::new(repo.open_store()?))
}
