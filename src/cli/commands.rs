use clap::Subcommand;

#[derive(Subcommand)]
pub enum ShopCommands {
    /// Register a shop, or re-activate it with a new access token
    Add {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Shop domain, e.g. acme.myshopify.com
        #[arg(long)]
        domain: String,

        /// Admin API access token
        #[arg(long)]
        token: String,
    },

    /// List registered shops
    List {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a shop uninstalled. Its mirrored data is kept.
    Deactivate {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Shop domain
        #[arg(long)]
        domain: String,
    },
}
