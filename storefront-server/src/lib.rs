//! Storefront Server
//!
//! Backend for a retail storefront: cart and pricing, coupon
//! validation, order capture with notification payloads, rank-ordered
//! merchandising lists, and store settings.
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # Config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Pool setup, migrations, schema caps, repositories
//! ├── pricing/       # Price breakdown calculator
//! ├── marketing/     # Coupon validation, rank list manager
//! ├── orders/        # Order writer, notification payload
//! ├── cart.rs        # Session cart
//! └── utils/         # Errors, responses, logger
//! ```

pub mod api;
pub mod cart;
pub mod core;
pub mod db;
pub mod marketing;
pub mod orders;
pub mod pricing;
pub mod utils;

pub use cart::Cart;
pub use core::{Config, Server, ServerState};
pub use pricing::{PriceBreakdown, compute};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResponse, AppResult};

/// Load env, create the working directory tree, and start logging.
pub fn setup_environment() -> std::io::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    utils::logger::init_logger_with_file(
        Some(&config.log_level),
        config.log_dir.as_deref(),
    );

    Ok(config)
}
