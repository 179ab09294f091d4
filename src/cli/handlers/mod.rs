//! Command handlers for the `support-desk` CLI
//!
//! Each handler opens the store through a [`HandlerContext`], performs one
//! operation and renders the result through the [`OutputFormatter`].
//!
//! [`OutputFormatter`]: crate::cli::OutputFormatter

mod board;
mod common;
mod config;
mod create;
mod export;
mod list;
mod show;
mod update;

pub use board::{handle_board_command, handle_services_command, handle_stats_command};
pub use common::{HandlerContext, open_store, resolve_ticket_ref};
pub use config::handle_config_command;
pub use create::{NewParams, handle_new_command};
pub use export::handle_export_command;
pub use list::{ListParams, SearchParams, handle_list_command, handle_search_command};
pub use show::handle_show_command;
pub use update::{
    EditParams, handle_assign_command, handle_comment_command, handle_edit_command,
    handle_status_command,
};
