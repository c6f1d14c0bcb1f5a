use clap::{Args, Subcommand};

use foodcost_core::{DemoStore, Notification, Patch};

use super::OutputFormat;

#[derive(Args)]
pub struct NotificationCommand {
    #[command(subcommand)]
    pub command: NotificationSubcommand,
}

#[derive(Subcommand)]
pub enum NotificationSubcommand {
    /// List notifications, newest last
    List {
        /// Only show unread notifications
        #[arg(long)]
        unread: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every unread notification as read
    ReadAll,
}

impl NotificationCommand {
    pub fn run(&self, store: &mut DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            NotificationSubcommand::List { unread, format } => {
                let notifications: Vec<&Notification> = store
                    .list::<Notification>()
                    .iter()
                    .filter(|n| !*unread || !n.read)
                    .collect();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&notifications)?);
                    }
                    OutputFormat::Text => {
                        if notifications.is_empty() {
                            println!("No notifications");
                            return Ok(());
                        }
                        for notification in &notifications {
                            println!("{}", notification);
                        }
                    }
                }
                Ok(())
            }

            NotificationSubcommand::Read { id } => {
                let patch = Patch::new().set("read", true);
                if !store.update::<Notification>(id, &patch)?.is_applied() {
                    return Err(format!("Notification not found: {}", id).into());
                }
                println!("Marked {} as read", id);
                Ok(())
            }

            NotificationSubcommand::ReadAll => {
                let count = mark_all_read(store)?;
                println!("Marked {} notification(s) as read", count);
                Ok(())
            }
        }
    }
}

fn mark_all_read(store: &mut DemoStore) -> Result<usize, foodcost_core::StoreError> {
    let unread: Vec<String> = store
        .list::<Notification>()
        .iter()
        .filter(|n| !n.read)
        .map(|n| n.id.to_string())
        .collect();

    let patch = Patch::new().set("read", true);
    for id in &unread {
        store.update::<Notification>(id, &patch)?;
    }
    Ok(unread.len())
}
