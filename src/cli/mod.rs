//! `shop-admin` command line: one subcommand group per resource.

mod catalog;
mod discounts;
mod media;
mod output;
mod tags;
mod users;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};

use crate::{
    app::AdminApp,
    config::AppConfig,
    error::{AppError, Result},
    services::{ListParams, auth_service},
    session::DASHBOARD_ROLES,
    utils::jwt,
};

pub use output::{Table, print_error};

#[derive(Debug, Parser)]
#[command(name = "shop-admin", version, about = "Back-office client for the shop API")]
pub struct Cli {
    /// API base URL, overrides ADMIN_API_BASE_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with an admin or employee account.
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Dashboard counters and latest products.
    Stats,
    #[command(subcommand)]
    Products(catalog::ProductCommand),
    #[command(subcommand)]
    Categories(catalog::CategoryCommand),
    #[command(subcommand)]
    Subcategories(catalog::SubcategoryCommand),
    #[command(subcommand)]
    Brands(catalog::BrandCommand),
    #[command(subcommand)]
    Tags(tags::TagCommand),
    #[command(subcommand)]
    ProductTags(tags::ProductTagCommand),
    #[command(subcommand)]
    Images(media::ImageCommand),
    #[command(subcommand)]
    Specs(media::SpecCommand),
    #[command(subcommand)]
    Discounts(discounts::DiscountCommand),
    #[command(subcommand)]
    Users(users::UserCommand),
}

/// Paging and search flags shared by every `list` command.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, short)]
    pub search: Option<String>,
}

impl ListArgs {
    /// Search and filters are applied before the page so they don't reset it.
    pub fn to_params(
        &self,
        app: &AdminApp,
        filters: Vec<(&'static str, Option<String>)>,
    ) -> ListParams {
        let mut params = ListParams::new().limit(self.limit.unwrap_or(app.page_size()));
        if let Some(search) = &self.search {
            params = params.search(search.as_str());
        }
        for (key, value) in filters {
            params = params.filter_opt(key, value);
        }
        params.page(self.page)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    let app = AdminApp::build(&config)?;

    match cli.command {
        Command::Login { email, password } => login(&app, &email, password).await,
        Command::Logout => {
            auth_service::logout(app.client())?;
            println!("Signed out.");
            Ok(())
        }
        command => {
            app.session().authorize(DASHBOARD_ROLES)?;
            dispatch(&app, command).await
        }
    }
}

async fn dispatch(app: &AdminApp, command: Command) -> Result<()> {
    match command {
        Command::Login { .. } | Command::Logout => Ok(()),
        Command::Whoami => whoami(app),
        Command::Stats => stats(app).await,
        Command::Products(cmd) => catalog::products(app, cmd).await,
        Command::Categories(cmd) => catalog::categories(app, cmd).await,
        Command::Subcategories(cmd) => catalog::subcategories(app, cmd).await,
        Command::Brands(cmd) => catalog::brands(app, cmd).await,
        Command::Tags(cmd) => tags::tags(app, cmd).await,
        Command::ProductTags(cmd) => tags::product_tags(app, cmd).await,
        Command::Images(cmd) => media::images(app, cmd).await,
        Command::Specs(cmd) => media::specs(app, cmd).await,
        Command::Discounts(cmd) => discounts::discounts(app, cmd).await,
        Command::Users(cmd) => users::users(app, cmd).await,
    }
}

async fn login(app: &AdminApp, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let user = auth_service::login(app.client(), email, &password)
        .await
        .map_err(|e| output::with_fallback(e, "Login failed"))?;
    println!("Signed in as {} ({}).", user.full_name, user.role);
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn whoami(app: &AdminApp) -> Result<()> {
    let session = app.session();
    let user = session.user().ok_or(AppError::SessionExpired)?;

    println!("{} <{}>", user.full_name, user.email);
    println!("Role: {}", user.role);
    if let Some(token) = session.access_token() {
        match jwt::expires_at(&token) {
            Some(at) if at <= Utc::now() => {
                println!("Access token expired at {}, it will be refreshed on the next request", at)
            }
            Some(at) => println!("Access token valid until {}", at),
            None => println!("Access token has no expiry"),
        }
    }
    Ok(())
}

async fn stats(app: &AdminApp) -> Result<()> {
    let stats = app
        .stats()
        .await
        .map_err(|e| output::with_fallback(e, "Failed to load dashboard stats"))?;

    let mut counts = Table::new(&["Metric", "Count"]);
    for (label, value) in stats.counts.entries() {
        counts.row(vec![label.to_string(), value.unwrap_or(0).to_string()]);
    }
    print!("{}", counts.render());

    if !stats.latest_products.is_empty() {
        println!();
        println!("Latest products");
        let mut latest = Table::new(&["ID", "Name", "Brand", "Price", "Added"]);
        for product in &stats.latest_products {
            latest.row(vec![
                product.id.to_string(),
                product.name.clone(),
                output::opt(product.brand.as_deref()),
                output::money(product.price),
                output::opt(product.created_at.map(|at| at.date())),
            ]);
        }
        print!("{}", latest.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "shop-admin", "brands", "list", "--page", "3", "--search", "can",
        ])
        .unwrap();
        match cli.command {
            Command::Brands(catalog::BrandCommand::List { list, .. }) => {
                assert_eq!(list.page, 3);
                assert_eq!(list.search.as_deref(), Some("can"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
