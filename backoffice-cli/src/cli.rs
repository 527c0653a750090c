//! CLI argument definitions for the back-office console.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "backoffice",
    version,
    about = "Shop back-office console",
    long_about = "Manage users, seller applications, products, categories, badges,\n\
                  coupons, popups, notices, FAQs and recommended search terms\n\
                  through the admin API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: <config dir>/backoffice/config.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Admin API base URL, e.g. https://shop.example/api/admin
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Log more (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in as an admin and remember the session.
    Login {
        #[arg(long)]
        email: String,
        /// Read from BACKOFFICE_PASSWORD when omitted.
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session.
    Logout,

    /// Print one page of a management list.
    List(ListArgs),

    /// Browse a list interactively: type to search, `:n`/`:p` to page.
    Browse {
        #[arg(value_enum)]
        resource: ResourceArg,
    },

    /// Show a notice or FAQ.
    Show {
        #[arg(value_enum)]
        resource: DetailArg,
        id: i64,
    },

    /// Delete a row.
    Delete {
        #[arg(value_enum)]
        resource: ResourceArg,
        id: i64,
    },

    /// Add a recommended search term.
    AddTerm { term: String },

    /// Approve or reject a seller application.
    Review {
        id: i64,
        #[arg(value_enum)]
        decision: ReviewDecision,
        /// Reject reason.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show or hide a product.
    SetVisible {
        id: i64,
        #[arg(action = clap::ArgAction::Set)]
        visible: bool,
    },

    /// Create a row, or edit it with `--id`.
    #[command(subcommand)]
    Save(SaveCommand),
}

#[derive(Subcommand, Debug)]
pub enum SaveCommand {
    Notice {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    Faq {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    Category {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: String,
        /// Parent category id.
        #[arg(long)]
        parent: Option<i64>,
    },
    Coupon {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        /// Discount amount, commas allowed.
        #[arg(long)]
        discount: String,
        #[arg(long = "min-order")]
        min_order: Option<String>,
        /// Last valid day, YYYY-MM-DD.
        #[arg(long)]
        expires: Option<String>,
    },
    Badge {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: String,
        /// Image file; required for a new badge.
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Search text.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Sort column.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    Users,
    SellerApplications,
    Products,
    Categories,
    Badges,
    Coupons,
    Popups,
    Notices,
    Faqs,
    SearchTerms,
}

impl ResourceArg {
    /// Page registry name.
    pub fn page_name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::SellerApplications => "seller-applications",
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Badges => "badges",
            Self::Coupons => "coupons",
            Self::Popups => "popups",
            Self::Notices => "notices",
            Self::Faqs => "faqs",
            Self::SearchTerms => "search-terms",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DetailArg {
    Notice,
    Faq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReviewDecision {
    Approve,
    Reject,
}
