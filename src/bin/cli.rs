//! docward CLI
//!
//! Terminal entry point for both audiences: authoring commands drive the
//! admin console, read commands drive the public site.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docward::{
    api::{AdminBackend, HttpAdminApi, HttpPublicApi},
    config,
    error::{AppError, Result},
    gateway::{ApiGateway, CredentialStore, Theme},
    interact::{AutoGate, InteractionGate, Notifier, Severity, StdioGate},
    models::{HeadingLevel, HeadingParent, ImageSource, NewImage},
    services::{AdminConsole, Reader},
};

/// docward - Documentation Platform Client
#[derive(Parser, Debug)]
#[command(name = "docward", version, about = "Documentation platform client")]
struct Cli {
    /// Path to the config file (default: docward.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the API base URL from the config
    #[arg(long)]
    base_url: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the persisted session
    Logout,

    /// Validate the current session
    Me,

    /// Show or set the UI theme preference (light|dark)
    Theme { value: Option<String> },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCmd,
    },

    /// Manage headings
    Heading {
        #[command(subcommand)]
        action: HeadingCmd,
    },

    /// Manage content blocks
    Content {
        #[command(subcommand)]
        action: ContentCmd,
    },

    /// Manage content images
    Image {
        #[command(subcommand)]
        action: ImageCmd,
    },

    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminCmd,
    },

    /// Walk one category's hierarchy as the console sees it
    Tree { category: String },

    /// Search the public site
    Search { query: String },

    /// Resolve the best search hit and print the selection path
    Open { query: String },

    /// Print a rendered public page
    Page {
        category: String,
        h1: String,
        h2: String,
    },

    /// Print the public menu tree
    Menu,

    /// Print a content body with image placeholders resolved
    Render { content_id: String },
}

#[derive(Subcommand, Debug)]
enum CategoryCmd {
    /// List categories
    List,
    /// Create a category
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sort_order: Option<i32>,
    },
    /// Update a category (blank --description clears it)
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sort_order: Option<i32>,
    },
    /// Delete a category
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum HeadingCmd {
    /// List headings of a category (level 1) or a parent heading (level 2)
    List {
        #[arg(long)]
        category_id: Option<String>,
        #[arg(long)]
        parent_id: Option<String>,
    },
    /// Create a heading under a category (level 1) or a heading (level 2)
    Create {
        title: String,
        #[arg(long, conflicts_with = "parent_id")]
        category_id: Option<String>,
        #[arg(long)]
        parent_id: Option<String>,
    },
    /// Update a heading (blank --description clears it)
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sort_order: Option<i32>,
    },
    /// Delete a heading
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ContentCmd {
    /// List content blocks of a heading
    List { heading_id: String },
    /// Create a content block, optionally with images
    Create {
        heading_id: String,
        /// Markdown body (use --body-file for longer text)
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// Read the markdown body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
        #[arg(long)]
        description: Option<String>,
        /// URL-backed image, repeatable; pairs with placeholders in order
        #[arg(long = "image-url")]
        image_urls: Vec<String>,
        /// Local image file to upload, repeatable
        #[arg(long = "image-file")]
        image_files: Vec<PathBuf>,
    },
    /// Update a content block
    Update {
        id: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a content block
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ImageCmd {
    /// List images of a content block
    List { content_id: String },
    /// Attach a URL-backed image
    Add {
        content_id: String,
        url: String,
        #[arg(long)]
        alt: Option<String>,
        #[arg(long)]
        sort_order: Option<i32>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Upload a local image file
    Upload {
        content_id: String,
        file: PathBuf,
        #[arg(long)]
        alt: Option<String>,
        #[arg(long)]
        sort_order: Option<i32>,
    },
    /// Delete an image
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminCmd {
    /// List admin accounts
    List,
    /// Create an admin account
    Create {
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Change an admin password (prompted)
    Passwd { id: String },
    /// Delete an admin account
    Delete { id: String },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Forward the pending console notification to the log.
fn drain_notifications(notifier: &mut Notifier) {
    if let Some(note) = notifier.take() {
        match note.severity {
            Severity::Success => log::info!("{}", note.message),
            Severity::Warning => log::warn!("{}", note.message),
            Severity::Error => log::error!("{}", note.message),
        }
    }
}

fn first_line(body: &str) -> &str {
    body.lines().next().unwrap_or_default()
}

async fn prompt_password(gate: &dyn InteractionGate, label: &str) -> Result<String> {
    gate.prompt(label, "")
        .await
        .ok_or_else(|| AppError::validation("a password is required"))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    let credentials = CredentialStore::new(&config.state_dir);
    let gateway = Arc::new(ApiGateway::new(&config, credentials.clone())?);
    let admin_api = HttpAdminApi::new(Arc::clone(&gateway));
    let public_api = HttpPublicApi::new(Arc::clone(&gateway));

    let gate: Box<dyn InteractionGate> = if cli.yes {
        Box::new(AutoGate::approving())
    } else {
        Box::new(StdioGate)
    };
    let mut console = AdminConsole::new(Box::new(admin_api.clone()), gate, credentials.clone());

    let outcome = run_command(cli.command, &mut console, &admin_api, public_api, &credentials).await;
    drain_notifications(&mut console.notifier);
    outcome
}

async fn run_command(
    command: Command,
    console: &mut AdminConsole,
    admin_api: &HttpAdminApi,
    public_api: HttpPublicApi,
    credentials: &CredentialStore,
) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password(&StdioGate, "Password").await?,
            };
            console.login(&email, &password).await?;
        }

        Command::Logout => {
            console.logout();
        }

        Command::Me => {
            let me = admin_api.me().await?;
            println!("{} ({})", me.email, me.id);
        }

        Command::Theme { value } => match value.as_deref() {
            None => println!("{}", credentials.theme().as_str()),
            Some("light") => credentials.set_theme(Theme::Light)?,
            Some("dark") => credentials.set_theme(Theme::Dark)?,
            Some(other) => {
                return Err(AppError::validation(format!(
                    "unknown theme '{other}' (expected light or dark)"
                )));
            }
        },

        Command::Category { action } => run_category(action, console).await?,
        Command::Heading { action } => run_heading(action, console, admin_api).await?,
        Command::Content { action } => run_content(action, console, admin_api).await?,
        Command::Image { action } => run_image(action, console, admin_api).await?,
        Command::Admin { action } => run_admin(action, console).await?,

        Command::Tree { category } => {
            console.startup().await?;
            let Some(target) = console
                .store
                .categories
                .iter()
                .find(|c| c.id == category || c.slug == category || c.name == category)
                .cloned()
            else {
                return Err(AppError::validation(format!(
                    "no category matches '{category}'"
                )));
            };

            console.select_category(&target.id).await?;
            println!("{} [{}]", target.name, target.id);

            let h1s = console.store.headings_l1.clone();
            for h1 in h1s {
                console.select_heading_l1(&h1.id).await?;
                println!("  {} [{}]", h1.title, h1.id);

                let h2s = console.store.headings_l2.clone();
                if h2s.is_empty() {
                    for content in &console.store.contents {
                        println!("    - {} [{}]", first_line(&content.body), content.id);
                    }
                    continue;
                }
                for h2 in h2s {
                    console.select_heading_l2(&h2.id).await?;
                    println!("    {} [{}]", h2.title, h2.id);
                    for content in &console.store.contents {
                        println!("      - {} [{}]", first_line(&content.body), content.id);
                    }
                }
            }
        }

        Command::Search { query } => {
            let reader = Reader::new(Box::new(public_api));
            let hits = reader.search(&query).await?;
            if hits.is_empty() {
                println!("No results.");
            }
            for hit in hits {
                println!(
                    "{:<9} {:.3}  {}  [{}]",
                    format!("{:?}", hit.source_type).to_lowercase(),
                    hit.similarity_score,
                    hit.matched_text,
                    hit.source_id
                );
            }
        }

        Command::Open { query } => {
            let mut reader = Reader::new(Box::new(public_api));
            reader.load().await?;

            let hits = reader.search(&query).await?;
            let Some(hit) = hits.first() else {
                println!("No results.");
                return Ok(());
            };
            if !reader.resolve_hit(hit).await? {
                println!("Hit could not be located in the hierarchy.");
                return Ok(());
            }

            let state = &reader.state;
            let path: Vec<&str> = [
                state.active_category.as_ref().map(|c| c.name.as_str()),
                state.active_h1.as_ref().map(|h| h.title.as_str()),
                state.active_h2.as_ref().map(|h| h.title.as_str()),
            ]
            .into_iter()
            .flatten()
            .collect();
            println!("{}", path.join(" > "));

            if let (Some(page), Some(content_id)) = (&state.page, &state.page_content_id) {
                let body = reader.rendered_body(content_id, &page.body).await;
                println!("\n{body}");
            } else {
                for content in &state.contents {
                    let body = reader.rendered_body(&content.id, &content.body).await;
                    println!("\n{body}");
                }
            }
        }

        Command::Page { category, h1, h2 } => {
            let reader = Reader::new(Box::new(public_api));
            let page = reader.page(&category, &h1, &h2).await?;
            println!("# {}", page.title);
            if let Some(description) = &page.description {
                println!("{description}\n");
            }
            println!("{}", page.body);
        }

        Command::Menu => {
            let reader = Reader::new(Box::new(public_api));
            for node in reader.menu().await? {
                println!("{} [{}]", node.title, node.slug);
                for child in &node.children {
                    println!("  {} [{}]", child.title, child.slug);
                }
            }
        }

        Command::Render { content_id } => {
            let content = admin_api.get_content(&content_id).await?;
            let reader = Reader::new(Box::new(public_api));
            let body = reader.rendered_body(&content_id, &content.body).await;
            println!("{body}");
        }
    }
    Ok(())
}

async fn run_category(action: CategoryCmd, console: &mut AdminConsole) -> Result<()> {
    match action {
        CategoryCmd::List => {
            console.startup().await?;
            for category in &console.store.categories {
                println!(
                    "{:<38} {:<3} {} ({})",
                    category.id, category.sort_order, category.name, category.slug
                );
            }
        }
        CategoryCmd::Create {
            name,
            description,
            sort_order,
        } => {
            console
                .create_category(&name, description.as_deref(), sort_order)
                .await?;
        }
        CategoryCmd::Update {
            id,
            name,
            description,
            sort_order,
        } => {
            console
                .update_category(&id, name.as_deref(), description.as_deref(), sort_order)
                .await?;
        }
        CategoryCmd::Delete { id } => {
            console.startup().await?;
            console.delete_category(&id).await?;
        }
    }
    Ok(())
}

async fn run_heading(
    action: HeadingCmd,
    console: &mut AdminConsole,
    admin_api: &HttpAdminApi,
) -> Result<()> {
    match action {
        HeadingCmd::List {
            category_id,
            parent_id,
        } => {
            use docward::models::HeadingFilter;
            let filter = match (category_id, parent_id) {
                (Some(category_id), None) => HeadingFilter::primary_of(category_id),
                (None, Some(parent_id)) => HeadingFilter::secondary_of(parent_id),
                _ => HeadingFilter::default(),
            };
            for heading in admin_api.list_headings(&filter).await? {
                println!(
                    "{:<38} L{} {:<3} {}",
                    heading.id,
                    u8::from(heading.level),
                    heading.sort_order,
                    heading.title
                );
            }
        }
        HeadingCmd::Create {
            title,
            category_id,
            parent_id,
        } => {
            // Exactly one parent kind; the pairing check runs before any
            // request is made.
            let level = if category_id.is_some() {
                HeadingLevel::Primary
            } else {
                HeadingLevel::Secondary
            };
            let parent = HeadingParent::from_raw(level, category_id, parent_id)?;

            // The has-content guard needs the parent's contents loaded.
            if let HeadingParent::Heading(parent_id) = &parent {
                console.startup().await?;
                let contents = admin_api.list_contents(Some(parent_id)).await?;
                if !contents.is_empty() {
                    return Err(AppError::validation(
                        "this heading already has content and cannot receive sub-headings",
                    ));
                }
            }
            console.create_heading(parent, &title).await?;
        }
        HeadingCmd::Update {
            id,
            title,
            description,
            sort_order,
        } => {
            console
                .update_heading(&id, title.as_deref(), description.as_deref(), sort_order)
                .await?;
        }
        HeadingCmd::Delete { id } => {
            console.delete_heading(&id).await?;
        }
    }
    Ok(())
}

async fn run_content(
    action: ContentCmd,
    console: &mut AdminConsole,
    admin_api: &HttpAdminApi,
) -> Result<()> {
    match action {
        ContentCmd::List { heading_id } => {
            for content in admin_api.list_contents(Some(&heading_id)).await? {
                println!("{:<38} {}", content.id, first_line(&content.body));
            }
        }
        ContentCmd::Create {
            heading_id,
            body,
            body_file,
            description,
            image_urls,
            image_files,
        } => {
            let body = match (body, body_file) {
                (Some(body), _) => body,
                (None, Some(path)) => tokio::fs::read_to_string(path).await?,
                (None, None) => {
                    return Err(AppError::validation("provide --body or --body-file"));
                }
            };

            // Placeholder pairing follows argument order: URLs first, then
            // uploaded files.
            let mut images = Vec::new();
            for (index, url) in image_urls.into_iter().enumerate() {
                images.push(NewImage {
                    source: ImageSource::Url(url),
                    alt: None,
                    sort_order: index as i32,
                    width: None,
                    height: None,
                });
            }
            let offset = images.len();
            for (index, path) in image_files.into_iter().enumerate() {
                images.push(NewImage {
                    source: ImageSource::File(path),
                    alt: None,
                    sort_order: (offset + index) as i32,
                    width: None,
                    height: None,
                });
            }

            console
                .create_content(&heading_id, &body, description.as_deref(), images)
                .await?;
        }
        ContentCmd::Update {
            id,
            body,
            description,
        } => {
            console
                .update_content(&id, body.as_deref(), description.as_deref())
                .await?;
        }
        ContentCmd::Delete { id } => {
            console.delete_content(&id).await?;
        }
    }
    Ok(())
}

async fn run_image(
    action: ImageCmd,
    console: &mut AdminConsole,
    admin_api: &HttpAdminApi,
) -> Result<()> {
    match action {
        ImageCmd::List { content_id } => {
            for image in admin_api.list_images(Some(&content_id)).await? {
                let size = match (image.width, image.height) {
                    (Some(w), Some(h)) => format!("{w}x{h}"),
                    _ => "auto".to_string(),
                };
                println!(
                    "{:<38} {:<3} {:<9} {}",
                    image.id, image.sort_order, size, image.url
                );
            }
        }
        ImageCmd::Add {
            content_id,
            url,
            alt,
            sort_order,
            width,
            height,
        } => {
            console
                .add_image(&content_id, &url, alt.as_deref(), sort_order, width, height)
                .await?;
        }
        ImageCmd::Upload {
            content_id,
            file,
            alt,
            sort_order,
        } => {
            console
                .upload_image(&content_id, &file, alt.as_deref(), sort_order, None, None)
                .await?;
        }
        ImageCmd::Delete { id } => {
            console.delete_image(&id).await?;
        }
    }
    Ok(())
}

async fn run_admin(action: AdminCmd, console: &mut AdminConsole) -> Result<()> {
    match action {
        AdminCmd::List => {
            console.startup().await?;
            for admin in &console.store.admins {
                println!("{:<38} {}", admin.id, admin.email);
            }
        }
        AdminCmd::Create { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password(&StdioGate, "Password").await?,
            };
            // Load the admin list so the duplicate pre-check has data.
            console.startup().await?;
            console.create_admin(&email, &password).await?;
        }
        AdminCmd::Passwd { id } => {
            console.change_admin_password(&id).await?;
        }
        AdminCmd::Delete { id } => {
            console.startup().await?;
            console.delete_admin(&id).await?;
        }
    }
    Ok(())
}
