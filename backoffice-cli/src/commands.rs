//! Command implementations

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use backoffice_api::{
    AdminClient, Badge, Category, Coupon, Faq, Notice, Popup, Product, Resource, ResourceId,
    SearchTerm, SellerApplication, User,
};
use backoffice_core::debounce::SearchDebouncer;
use backoffice_core::detail::{DetailController, DetailState};
use backoffice_core::mutation::ModalFormState;
use backoffice_core::pages::{self, ListPage};
use backoffice_core::query::{Completion, ListQueryController, ListQueryState, SortDirection};
use backoffice_core::traits::AuthStore;
use backoffice_core::{find_page, CoreError, ServiceContext};

use crate::cli::{DetailArg, ListArgs, ResourceArg, ReviewDecision, SaveCommand};
use crate::config::{data_dir, AppConfig};
use crate::render::{self, TableRow};
use crate::session_store::FileAuthStore;

/// Run `$body` with `$r` bound to the resource type of `$resource`.
macro_rules! with_resource {
    ($resource:expr, $r:ident => $body:expr) => {
        match $resource {
            ResourceArg::Users => {
                type $r = User;
                $body
            }
            ResourceArg::SellerApplications => {
                type $r = SellerApplication;
                $body
            }
            ResourceArg::Products => {
                type $r = Product;
                $body
            }
            ResourceArg::Categories => {
                type $r = Category;
                $body
            }
            ResourceArg::Badges => {
                type $r = Badge;
                $body
            }
            ResourceArg::Coupons => {
                type $r = Coupon;
                $body
            }
            ResourceArg::Popups => {
                type $r = Popup;
                $body
            }
            ResourceArg::Notices => {
                type $r = Notice;
                $body
            }
            ResourceArg::Faqs => {
                type $r = Faq;
                $body
            }
            ResourceArg::SearchTerms => {
                type $r = SearchTerm;
                $body
            }
        }
    };
}

/// Turn a core error into a user-facing failure, keeping the details in the log.
fn fail(err: CoreError) -> anyhow::Error {
    tracing::debug!("{err}");
    anyhow!(err.user_message())
}

pub struct Console {
    config: AppConfig,
    ctx: ServiceContext,
}

impl Console {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Arc::new(AdminClient::new(config.client_config()?)?);
        let store: Arc<dyn AuthStore> = Arc::new(FileAuthStore::new(data_dir()?));
        Ok(Self::with_context(config, ServiceContext::new(client, store)))
    }

    pub fn with_context(config: AppConfig, ctx: ServiceContext) -> Self {
        Self { config, ctx }
    }

    /// Use `BACKOFFICE_TOKEN` when set, the stored session otherwise.
    async fn authorize(&self) -> Result<()> {
        if let Some(token) = &self.config.token {
            tracing::debug!("Using token from environment");
            self.ctx.client.set_access_token(Some(token.clone())).await;
            return Ok(());
        }
        let user = self.ctx.auth().restore().await.map_err(fail)?;
        tracing::debug!("Restored session of {}", user.email);
        Ok(())
    }

    fn page(resource: ResourceArg) -> Result<&'static ListPage> {
        find_page(resource.page_name())
            .with_context(|| format!("No list page for {}", resource.page_name()))
    }

    // ============ Session ============

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let user = self.ctx.auth().login(email, password).await.map_err(fail)?;
        println!("Signed in as {}", user.username.as_deref().unwrap_or(&user.email));
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.ctx.auth().logout().await.map_err(fail)?;
        println!("Signed out");
        Ok(())
    }

    // ============ Lists ============

    pub async fn list(&self, args: &ListArgs) -> Result<()> {
        self.authorize().await?;
        let page = Self::page(args.resource)?;
        with_resource!(args.resource, R => self.list_page::<R>(page, args).await)
    }

    async fn list_page<R>(&self, page: &ListPage, args: &ListArgs) -> Result<()>
    where
        R: Resource + TableRow,
    {
        let mut state = match &args.sort {
            Some(column) => {
                let direction = if args.desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                ListQueryState::sorted_by(column.clone(), direction)
            }
            None => page.initial_state(),
        };
        if let Some(search) = &args.search {
            state.set_search(search.clone());
        }
        let requested = args.page.max(1);
        state.current_page = requested;

        let mut list = self
            .ctx
            .resource::<R>()
            .controller(page, self.config.page_size)
            .with_state(state);
        if list.fetch().await == Completion::Failed {
            bail!(list.status().error().unwrap_or_default().to_string());
        }
        if list.state().current_page != requested {
            eprintln!(
                "Page {requested} does not exist, showing page {}",
                list.state().current_page
            );
        }
        print!("{}", list_view(&list));
        Ok(())
    }

    /// Interactive list: plain lines search (debounced), `:` lines are commands.
    pub async fn browse(&self, resource: ResourceArg) -> Result<()> {
        self.authorize().await?;
        let page = Self::page(resource)?;
        with_resource!(resource, R => self.browse_page::<R>(page).await)
    }

    async fn browse_page<R>(&self, page: &ListPage) -> Result<()>
    where
        R: Resource + TableRow,
    {
        let mut list = self
            .ctx
            .resource::<R>()
            .controller(page, self.config.page_size)
            .with_debouncer(SearchDebouncer::new(self.config.search_debounce()));
        list.fetch().await;
        print!("{}", list_view(&list));
        eprintln!("{BROWSE_HELP}");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let ticket = match BrowseInput::parse(&line) {
                        BrowseInput::Quit => break,
                        BrowseInput::Search(text) => {
                            list.set_search(text);
                            continue;
                        }
                        BrowseInput::Next => match list.window().next_page() {
                            Some(next) => list.set_page(next).await,
                            None => continue,
                        },
                        BrowseInput::Prev => match list.window().prev_page() {
                            Some(prev) => list.set_page(prev).await,
                            None => continue,
                        },
                        BrowseInput::Page(number) => list.set_page(number).await,
                        BrowseInput::Sort(column) => Ok(list.toggle_sort(&column).await),
                        BrowseInput::Refresh => Ok(list.begin_fetch().await),
                        BrowseInput::Help => {
                            eprintln!("{BROWSE_HELP}");
                            continue;
                        }
                    };
                    match ticket {
                        Ok(ticket) => {
                            list.run(ticket).await;
                            print!("{}", list_view(&list));
                        }
                        Err(err) => eprintln!("{}", err.user_message()),
                    }
                }
                Some(ticket) = list.next_search() => {
                    list.run(ticket).await;
                    print!("{}", list_view(&list));
                }
            }
        }

        list.unmount().await;
        Ok(())
    }

    // ============ Detail ============

    pub async fn show(&self, resource: DetailArg, id: ResourceId) -> Result<()> {
        self.authorize().await?;
        let text = match resource {
            DetailArg::Notice => self.detail::<Notice>(&pages::NOTICES, id, render::notice).await?,
            DetailArg::Faq => self.detail::<Faq>(&pages::FAQS, id, render::faq).await?,
        };
        println!("{text}");
        Ok(())
    }

    async fn detail<R: Resource>(
        &self,
        page: &ListPage,
        id: ResourceId,
        view: fn(&R) -> String,
    ) -> Result<String> {
        let failure = page
            .detail_failure
            .with_context(|| format!("{} has no detail view", page.name))?;
        let source = self.ctx.resource::<R>().detail_source();
        let mut panel = DetailController::new(failure);
        match panel.show(id, source.as_ref()).await {
            DetailState::Loaded { resource, .. } => Ok(view(resource)),
            DetailState::Failed { message, .. } => Err(anyhow!(message.clone())),
            DetailState::Closed | DetailState::Loading { .. } => Err(anyhow!(failure)),
        }
    }

    // ============ Mutations ============

    pub async fn delete(&self, resource: ResourceArg, id: ResourceId) -> Result<()> {
        self.authorize().await?;
        with_resource!(resource, R => self.ctx.resource::<R>().delete(id).await.map_err(fail)?);
        println!("Deleted {} {id}", resource.page_name());
        Ok(())
    }

    pub async fn add_term(&self, term: &str) -> Result<()> {
        self.authorize().await?;
        let mut form = ModalFormState::new();
        form.open_with([("term", term)]);
        if let Err(err) = self.ctx.resource::<SearchTerm>().add_term(&mut form).await {
            return Err(form_failure(&form, err));
        }
        println!("Added search term {:?}", term.trim());
        Ok(())
    }

    pub async fn review(
        &self,
        id: ResourceId,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> Result<()> {
        self.authorize().await?;
        let applications = self.ctx.resource::<SellerApplication>();
        match decision {
            ReviewDecision::Approve => {
                applications.approve(id).await.map_err(fail)?;
                println!("Approved application {id}");
            }
            ReviewDecision::Reject => {
                let mut form = ModalFormState::new();
                form.open_with(reason.map(|r| ("reject_reason", r)));
                if let Err(err) = applications.reject(&mut form, id).await {
                    return Err(form_failure(&form, err));
                }
                println!("Rejected application {id}");
            }
        }
        Ok(())
    }

    pub async fn set_visible(&self, id: ResourceId, visible: bool) -> Result<()> {
        self.authorize().await?;
        self.ctx
            .resource::<Product>()
            .set_visibility(id, visible)
            .await
            .map_err(fail)?;
        println!("Product {id} is now {}", if visible { "visible" } else { "hidden" });
        Ok(())
    }

    /// Submit a create/edit form.
    pub async fn save(&self, command: SaveCommand) -> Result<()> {
        self.authorize().await?;
        let mut form = ModalFormState::new();
        let (label, id, outcome) = match command {
            SaveCommand::Notice { id, title, content } => {
                form.open_with([("title", title), ("content", content)]);
                let outcome = self.ctx.resource::<Notice>().save_notice(&mut form, id).await;
                ("notice", id, outcome)
            }
            SaveCommand::Faq {
                id,
                question,
                answer,
            } => {
                form.open_with([("question", question), ("answer", answer)]);
                let outcome = self.ctx.resource::<Faq>().save_faq(&mut form, id).await;
                ("faq", id, outcome)
            }
            SaveCommand::Category { id, name, parent } => {
                form.open_with([("name", name)]);
                form.select_parent(parent);
                let outcome = self.ctx.resource::<Category>().save_category(&mut form, id).await;
                ("category", id, outcome)
            }
            SaveCommand::Coupon {
                id,
                name,
                code,
                discount,
                min_order,
                expires,
            } => {
                let mut fields = vec![("name", name), ("code", code), ("discount_amount", discount)];
                fields.extend(min_order.map(|v| ("min_order_amount", v)));
                fields.extend(expires.map(|v| ("expires_at", v)));
                form.open_with(fields);
                let outcome = self.ctx.resource::<Coupon>().save_coupon(&mut form, id).await;
                ("coupon", id, outcome)
            }
            SaveCommand::Badge { id, name, image } => {
                form.open_with([("name", name)]);
                let uploader = self.ctx.uploader();
                let outcome = self
                    .ctx
                    .resource::<Badge>()
                    .save_badge(&mut form, id, image.as_deref(), uploader.as_ref())
                    .await;
                ("badge", id, outcome)
            }
        };
        if let Err(err) = outcome {
            return Err(form_failure(&form, err));
        }
        match id {
            Some(id) => println!("Updated {label} {id}"),
            None => println!("Created {label}"),
        }
        Ok(())
    }
}

fn form_failure(form: &ModalFormState, err: CoreError) -> anyhow::Error {
    tracing::debug!("{err}");
    anyhow!(form
        .error()
        .map_or_else(|| err.user_message(), ToString::to_string))
}

/// Rows, error line and paginator of a list.
pub fn list_view<R>(list: &ListQueryController<R>) -> String
where
    R: Resource + TableRow,
{
    let mut out = String::new();
    if let Some(err) = list.status().error() {
        out.push_str(&format!("! {err}\n"));
    }
    if list.items().is_empty() {
        out.push_str("(no rows)\n");
    } else {
        out.push_str(&render::table(list.items()));
    }
    out.push_str(&format!(
        "{}  ({} total)\n",
        render::window(&list.window()),
        list.total_count()
    ));
    out
}

const BROWSE_HELP: &str =
    "type to search · :n next · :p prev · :<page> go to page · :s <column> sort · :r refresh · :q quit";

#[derive(Debug, PartialEq, Eq)]
enum BrowseInput {
    Search(String),
    Next,
    Prev,
    Page(u32),
    Sort(String),
    Refresh,
    Help,
    Quit,
}

impl BrowseInput {
    fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Self::Search(line.to_string());
        };
        let mut words = command.split_whitespace();
        match (words.next(), words.next()) {
            (Some("q" | "quit"), _) => Self::Quit,
            (Some("n" | "next"), _) => Self::Next,
            (Some("p" | "prev"), _) => Self::Prev,
            (Some("r" | "refresh"), _) => Self::Refresh,
            (Some("s" | "sort"), Some(column)) => Self::Sort(column.to_string()),
            (Some(number), None) => number.parse().map_or(Self::Help, Self::Page),
            _ => Self::Help,
        }
    }
}
