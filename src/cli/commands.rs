//! Command execution for the solrbuddy CLI
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use crate::cli::args::{Args, Commands, PagingArgs};
use crate::client::{InMemoryBackend, SearchBackend, SolrClient};
use crate::config::Config;
use crate::repository::ProductRepository;
use crate::types::{Page, PageRequest, Product};

/// Load configuration and apply command-line overrides
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(url) = &args.url {
        config.solr.url = url.clone();
    }
    if let Some(core) = &args.core {
        config.solr.core = core.clone();
    }
    Ok(config)
}

/// Build the repository the command will run against
pub fn build_repository(args: &Args, config: &Config) -> Result<ProductRepository> {
    let backend: Arc<dyn SearchBackend> = if args.memory {
        info!("using in-memory index");
        Arc::new(InMemoryBackend::new())
    } else {
        info!(url = %config.solr.url, core = %config.solr.core, "using Solr");
        Arc::new(SolrClient::with_config(config.solr_config())?)
    };

    Ok(ProductRepository::with_named_queries(
        backend,
        config.named_queries()?,
    )?)
}

/// Execute the parsed command
pub async fn run(args: &Args) -> Result<()> {
    let config = resolve_config(args)?;
    let repo = build_repository(args, &config)?;

    match &args.command {
        Commands::Save {
            id,
            generate_id,
            name,
            category,
            description,
        } => {
            let id = match (id.as_ref(), *generate_id) {
                (Some(id), _) => id.clone(),
                (None, true) => uuid::Uuid::new_v4().to_string(),
                (None, false) => bail!("--id is required (or pass --generate-id)"),
            };
            let saved = repo
                .save(&Product::new(id, name.as_str(), category.as_str(), description.as_str()))
                .await?;
            println!("{} {}", "Saved".green().bold(), saved.id().bold());
        }
        Commands::Get { id } => match repo.find_one(id).await? {
            Some(product) => print_product(&product),
            None => println!("{}", format!("No product with id '{}'", id).yellow()),
        },
        Commands::Delete { id } => {
            repo.delete_by_id(id).await?;
            println!("{} {}", "Deleted".green().bold(), id.bold());
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                bail!("Refusing to delete every product without --yes");
            }
            repo.delete_all().await?;
            println!("{}", "Deleted all products".green().bold());
        }
        Commands::FindByName { name } => {
            let products = repo.find_by_name(name).await?;
            if products.is_empty() {
                println!("{}", "No results found.".yellow());
            }
            for product in &products {
                print_product(product);
            }
        }
        Commands::Search { term, paging } => {
            let page = repo
                .find_by_custom_query(term, page_request(paging)?)
                .await?;
            print_page(&page);
        }
        Commands::NamedSearch {
            args: query_args,
            query,
            paging,
        } => {
            let refs: Vec<&str> = query_args.iter().map(String::as_str).collect();
            let page = repo
                .find_by_query(query, &refs, page_request(paging)?)
                .await?;
            print_page(&page);
        }
        Commands::Count => {
            let count = repo.count().await?;
            println!("{} {}", "Documents:".bold(), count.to_string().green());
        }
        Commands::Ping => {
            if !repo.ping().await? {
                return Err(anyhow!(
                    "Solr did not answer at {}/{}",
                    config.solr.url,
                    config.solr.core
                ));
            }
            println!("{}", "Backend is up".green().bold());
        }
        Commands::Config => show_config(args, &config)?,
    }

    Ok(())
}

fn page_request(paging: &PagingArgs) -> Result<PageRequest> {
    PageRequest::new(paging.page, paging.size).context("Invalid paging arguments")
}

fn print_product(product: &Product) {
    println!("{}", product.id().cyan().bold());
    println!("  Name:        {}", product.name());
    println!("  Category:    {}", product.category());
    println!("  Description: {}", product.description());
}

fn print_page(page: &Page<Product>) {
    if page.is_empty() {
        println!("{}", "No results found.".yellow());
    }
    for product in page.iter() {
        print_product(product);
    }
    println!(
        "\n{} {} of {} (page {}/{})",
        "Showing".green().bold(),
        page.number_of_elements(),
        page.total_elements(),
        page.number().saturating_add(1),
        page.total_pages().max(1)
    );
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("{}", "=== solrbuddy Configuration ===".bold().cyan());

    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    println!("File: {}", path.display());
    println!();

    println!("Solr:");
    println!("  URL:     {}", config.solr.url);
    println!("  Core:    {}", config.solr.core);
    println!("  Timeout: {}s", config.solr.timeout_secs);
    match config.solr.commit_within_ms {
        Some(ms) => println!("  Commit:  within {}ms", ms),
        None => println!("  Commit:  on every write"),
    }
    println!();

    println!("Named queries:");
    for (name, template) in &config.queries {
        println!("  {} = {}", name.bold(), template);
    }
    println!();

    println!("Verbosity: {:?}", args.verbosity());
    Ok(())
}
