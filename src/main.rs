use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use shopfront::cli::{
    AdminAction, AdminProductAction, CartAction, Cli, Commands, ConfigAction, OrderAction,
    ProfileAction, SessionAction, generate_completions,
};
use shopfront::commands::{
    AvatarPlacement, cmd_admin_product_create, cmd_admin_product_delete,
    cmd_admin_product_update, cmd_browse, cmd_cart_add, cmd_cart_ls, cmd_cart_rm,
    cmd_categories, cmd_config_get, cmd_config_set, cmd_config_show, cmd_order_ls,
    cmd_order_pay, cmd_order_place, cmd_order_return, cmd_order_show, cmd_product,
    cmd_products, cmd_profile_avatar, cmd_profile_password, cmd_profile_show,
    cmd_session_login, cmd_session_logout, cmd_session_show, cmd_sidebar,
};
use shopfront::profile::PasswordChangeForm;

/// Logs go to stderr so they never mix with command output
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHOPFRONT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Products {
            listing,
            page,
            all,
            max_pages,
            output,
        } => cmd_products(&listing, page, all, max_pages, output).await,
        Commands::Product { id, output } => cmd_product(id, output).await,
        Commands::Categories { output } => cmd_categories(output).await,
        Commands::Sidebar { limit, output } => cmd_sidebar(limit, output).await,
        Commands::Browse { listing } => cmd_browse(&listing).await,

        Commands::Cart { action } => match action {
            CartAction::Ls { output } => cmd_cart_ls(output).await,
            CartAction::Add {
                product_id,
                quantity,
                output,
            } => cmd_cart_add(product_id, quantity, output).await,
            CartAction::Rm { product_id, output } => cmd_cart_rm(product_id, output).await,
        },

        Commands::Order { action } => match action {
            OrderAction::Place {
                address,
                note,
                output,
            } => cmd_order_place(&address, note.as_deref(), output).await,
            OrderAction::Ls { output } => cmd_order_ls(output).await,
            OrderAction::Show { id, output } => cmd_order_show(id, output).await,
            OrderAction::Pay { id, method, output } => cmd_order_pay(id, method, output).await,
            OrderAction::Return { url, output } => {
                cmd_order_return(url.as_deref(), output).await
            }
        },

        Commands::Profile { action } => match action {
            ProfileAction::Show { output } => cmd_profile_show(output).await,
            ProfileAction::Password {
                current,
                new_password,
                confirm,
                output,
            } => {
                let form = PasswordChangeForm {
                    current_password: current,
                    new_password,
                    confirm_password: confirm,
                };
                cmd_profile_password(form, output).await
            }
            ProfileAction::Avatar {
                path,
                zoom,
                rotate,
                pan_x,
                pan_y,
                save,
                output,
            } => {
                let placement = AvatarPlacement {
                    zoom,
                    rotate,
                    pan_x,
                    pan_y,
                };
                cmd_profile_avatar(&path, placement, save.as_deref(), output).await
            }
        },

        Commands::Session { action } => match action {
            SessionAction::Login {
                email,
                password,
                output,
            } => cmd_session_login(&email, &password, output).await,
            SessionAction::Logout { output } => cmd_session_logout(output),
            SessionAction::Show { output } => cmd_session_show(output),
        },

        Commands::Admin { action } => match action {
            AdminAction::Product { action } => match action {
                AdminProductAction::Create { fields, output } => {
                    cmd_admin_product_create(&fields, output).await
                }
                AdminProductAction::Update { id, fields, output } => {
                    cmd_admin_product_update(id, &fields, output).await
                }
                AdminProductAction::Delete { id, output } => {
                    cmd_admin_product_delete(id, output).await
                }
            },
        },

        Commands::Config { action } => match action {
            ConfigAction::Show { output } => cmd_config_show(output),
            ConfigAction::Get { key, output } => cmd_config_get(&key, output),
            ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
        },

        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
