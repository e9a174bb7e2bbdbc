//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::category::{format_category_details, format_category_list};
use crate::error::FinsightResult;
use crate::services::{CategoryService, CategoryUpdate};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Icon (an emoji works well)
        #[arg(short, long)]
        icon: Option<String>,
        /// Color as a hex string, e.g. "#22c55e"
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        icon: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
        /// New position in the list
        #[arg(short, long)]
        order: Option<i32>,
    },

    /// Delete a category that no transaction uses
    #[command(alias = "delete")]
    Remove {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> FinsightResult<()> {
    let service = CategoryService::new(storage, settings.require_user()?);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { name, icon, color } => {
            let category = service.create(&name, icon.as_deref(), color.as_deref())?;
            println!("Created category: {} {}", category.icon, category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.require(&category)?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Edit {
            category,
            name,
            icon,
            color,
            order,
        } => {
            if name.is_none() && icon.is_none() && color.is_none() && order.is_none() {
                println!("No changes specified. Use --name, --icon, --color, or --order.");
                return Ok(());
            }

            let updated = service.update(
                &category,
                CategoryUpdate {
                    name,
                    icon,
                    color,
                    order,
                },
            )?;
            println!("Updated category: {} {}", updated.icon, updated.name);
        }

        CategoryCommands::Remove { category } => {
            let removed = service.delete(&category)?;
            println!("Deleted category: {}", removed.name);
        }
    }

    Ok(())
}
