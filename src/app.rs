use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::account::api::UsersApi;
use crate::account::{EditForm, UsersPage};
use crate::config::AppConfig;
use crate::content::{parse_blocks, Block, Run};
use crate::feed::{self, Filters, Post};
use crate::nav::{self, NavItem};
use crate::pricing::Product;

/// Which screen fills the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Blog,
    Article,
    Pricing,
    Users,
}

/// Focused pane inside the blog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogPane {
    Posts,
    Categories,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Menu,          // Navigation tree
    EditUser,
    ConfirmDelete,
    Help,
}

/// Outcome of the last feed load. A failure is terminal for the blog
/// views until an explicit refresh.
#[derive(Debug)]
pub enum FeedState {
    Ready(Vec<Post>),
    Failed(String),
}

impl FeedState {
    pub fn posts(&self) -> &[Post] {
        match self {
            FeedState::Ready(posts) => posts,
            FeedState::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FeedState::Ready(_) => None,
            FeedState::Failed(message) => Some(message),
        }
    }
}

/// Outcome of the last users-list load (admin view).
#[derive(Debug)]
pub enum UsersState {
    NotLoaded,
    Ready(UsersPage),
    Failed(String),
}

impl UsersState {
    pub fn users(&self) -> &[crate::account::UserPublic] {
        match self {
            UsersState::Ready(page) => &page.data,
            _ => &[],
        }
    }

    pub fn total(&self) -> usize {
        match self {
            UsersState::Ready(page) => page.count,
            _ => 0,
        }
    }
}

/// An open article. `blocks` is None when the id is not in the loaded
/// set, which renders as the not-found message.
#[derive(Debug)]
pub struct Article {
    pub id: u64,
    pub blocks: Option<Vec<Block>>,
}

/// Fields of the edit popup, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Email,
    FullName,
    Password,
    ConfirmPassword,
    Superuser,
    Active,
    HasSubscription,
    Trial,
    Deactivated,
}

impl EditField {
    pub const ALL: [EditField; 9] = [
        EditField::Email,
        EditField::FullName,
        EditField::Password,
        EditField::ConfirmPassword,
        EditField::Superuser,
        EditField::Active,
        EditField::HasSubscription,
        EditField::Trial,
        EditField::Deactivated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditField::Email => "Email",
            EditField::FullName => "Full name",
            EditField::Password => "Set Password",
            EditField::ConfirmPassword => "Confirm Password",
            EditField::Superuser => "Is superuser?",
            EditField::Active => "Is active?",
            EditField::HasSubscription => "Has Subscription?",
            EditField::Trial => "Is Trial?",
            EditField::Deactivated => "Is Deactivated?",
        }
    }

    /// Flags toggle with Space/Enter; everything else takes typed input.
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            EditField::Superuser
                | EditField::Active
                | EditField::HasSubscription
                | EditField::Trial
                | EditField::Deactivated
        )
    }
}

pub struct App {
    pub view: View,
    pub popup: Popup,

    // Blog state
    pub feed: FeedState,
    pub filters: Filters,
    pub blog_pane: BlogPane,
    pub selected_post: usize,
    pub selected_category: usize,
    pub selected_tag: usize,

    // Article state
    pub article: Option<Article>,
    pub article_scroll: usize,

    // Pricing state
    pub selected_product: usize, // index into Product::ALL

    // Users state (admin view)
    pub users: UsersState,
    pub selected_user: usize,

    // Edit popup
    pub edit_form: EditForm,
    pub edit_user_id: Option<String>,
    pub edit_field: usize, // index into EditField::ALL
    pub edit_errors: Vec<String>,

    // Delete confirmation target: (id, label)
    pub delete_target: Option<(String, String)>,

    // Navigation popup
    pub nav_items: Vec<NavItem>,
    pub menu_index: usize,
    pub open_menu: Option<usize>,
    pub menu_sub_index: usize,

    // Clients
    http: reqwest::Client,
    users_api: Option<UsersApi>,

    pub config: AppConfig,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        // One awaited load before the first frame; a failure becomes the
        // blog view's terminal error state rather than aborting the app.
        let feed = match feed::fetch_posts(&http, &config.feed_url).await {
            Ok(posts) => FeedState::Ready(posts),
            Err(e) => {
                warn!("initial feed load failed: {}", e);
                FeedState::Failed(e.to_string())
            }
        };

        let users_api = config
            .api_base
            .as_ref()
            .map(|base| UsersApi::new(http.clone(), base.clone()));
        let nav_items = nav::build_nav(&config.session);

        Ok(Self {
            view: View::Blog,
            popup: Popup::None,

            feed,
            filters: Filters::default(),
            blog_pane: BlogPane::Posts,
            selected_post: 0,
            selected_category: 0,
            selected_tag: 0,

            article: None,
            article_scroll: 0,

            selected_product: 0,

            users: UsersState::NotLoaded,
            selected_user: 0,

            edit_form: EditForm::default(),
            edit_user_id: None,
            edit_field: 0,
            edit_errors: Vec::new(),

            delete_target: None,

            nav_items,
            menu_index: 0,
            open_menu: None,
            menu_sub_index: 0,

            http,
            users_api,

            config,

            status_message: None,
            status_message_time: None,
        })
    }

    // ---- derived blog views -------------------------------------------------

    /// Posts passing the active filters, in feed order.
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.feed
            .posts()
            .iter()
            .filter(|post| self.filters.matches(post))
            .collect()
    }

    pub fn categories(&self) -> Vec<(String, usize)> {
        feed::popular_categories(self.feed.posts())
    }

    pub fn tags(&self) -> Vec<String> {
        feed::popular_tags(self.feed.posts())
    }

    pub fn current_product(&self) -> Product {
        Product::ALL[self.selected_product % Product::ALL.len()]
    }

    // ---- key handling -------------------------------------------------------

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key).await;
        }

        self.handle_normal_key(key).await
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // View switching
            KeyCode::Char('1') => {
                self.view = View::Blog;
            }
            KeyCode::Char('2') => {
                self.view = View::Pricing;
            }
            KeyCode::Char('3') => self.open_admin().await,

            // Back out of the article view
            KeyCode::Esc | KeyCode::Backspace => {
                if self.view == View::Article {
                    self.view = View::Blog;
                }
            }

            // Pane cycling inside the blog view
            KeyCode::Tab => {
                if self.view == View::Blog {
                    self.blog_pane = match self.blog_pane {
                        BlogPane::Posts => BlogPane::Categories,
                        BlogPane::Categories => BlogPane::Tags,
                        BlogPane::Tags => BlogPane::Posts,
                    };
                }
            }
            KeyCode::BackTab => {
                if self.view == View::Blog {
                    self.blog_pane = match self.blog_pane {
                        BlogPane::Posts => BlogPane::Tags,
                        BlogPane::Categories => BlogPane::Posts,
                        BlogPane::Tags => BlogPane::Categories,
                    };
                }
            }

            // Vertical navigation
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::PageDown => {
                if self.view == View::Article {
                    self.article_scroll = self.article_scroll.saturating_add(10);
                }
            }
            KeyCode::PageUp => {
                if self.view == View::Article {
                    self.article_scroll = self.article_scroll.saturating_sub(10);
                }
            }

            // Product tabs in the pricing view
            KeyCode::Char('h') | KeyCode::Left => {
                if self.view == View::Pricing {
                    self.selected_product = self
                        .selected_product
                        .checked_sub(1)
                        .unwrap_or(Product::ALL.len() - 1);
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.view == View::Pricing {
                    self.selected_product = (self.selected_product + 1) % Product::ALL.len();
                }
            }

            // Activate the selection
            KeyCode::Char(' ') | KeyCode::Enter => self.activate_selection().await,

            // Admin: delete the selected user (with confirmation)
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.view == View::Users {
                    self.start_delete();
                }
            }

            // Refresh whatever the current view shows
            KeyCode::Char('R') => self.refresh().await,

            // Navigation menu
            KeyCode::Char('m') => {
                self.popup = Popup::Menu;
                self.menu_index = 0;
                self.open_menu = None;
                self.menu_sub_index = 0;
            }

            // Help
            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    async fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Menu => self.handle_menu_key(key).await,
            Popup::EditUser => self.handle_edit_key(key).await?,
            Popup::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.popup = Popup::None;
                    self.confirm_delete().await;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.delete_target = None;
                    self.popup = Popup::None;
                }
                _ => {}
            },
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => {}
        }
        Ok(())
    }

    fn move_down(&mut self) {
        match self.view {
            View::Blog => match self.blog_pane {
                BlogPane::Posts => {
                    let len = self.visible_posts().len();
                    if len > 0 {
                        self.selected_post = (self.selected_post + 1) % len;
                    }
                }
                BlogPane::Categories => {
                    let len = self.categories().len();
                    if len > 0 {
                        self.selected_category = (self.selected_category + 1) % len;
                    }
                }
                BlogPane::Tags => {
                    let len = self.tags().len();
                    if len > 0 {
                        self.selected_tag = (self.selected_tag + 1) % len;
                    }
                }
            },
            View::Article => {
                self.article_scroll = self.article_scroll.saturating_add(1);
            }
            View::Users => {
                let len = self.users.users().len();
                if len > 0 {
                    self.selected_user = (self.selected_user + 1) % len;
                }
            }
            View::Pricing => {}
        }
    }

    fn move_up(&mut self) {
        match self.view {
            View::Blog => match self.blog_pane {
                BlogPane::Posts => {
                    let len = self.visible_posts().len();
                    if len > 0 {
                        self.selected_post =
                            self.selected_post.checked_sub(1).unwrap_or(len - 1);
                    }
                }
                BlogPane::Categories => {
                    let len = self.categories().len();
                    if len > 0 {
                        self.selected_category =
                            self.selected_category.checked_sub(1).unwrap_or(len - 1);
                    }
                }
                BlogPane::Tags => {
                    let len = self.tags().len();
                    if len > 0 {
                        self.selected_tag =
                            self.selected_tag.checked_sub(1).unwrap_or(len - 1);
                    }
                }
            },
            View::Article => {
                self.article_scroll = self.article_scroll.saturating_sub(1);
            }
            View::Users => {
                let len = self.users.users().len();
                if len > 0 {
                    self.selected_user = self.selected_user.checked_sub(1).unwrap_or(len - 1);
                }
            }
            View::Pricing => {}
        }
    }

    async fn activate_selection(&mut self) {
        match self.view {
            View::Blog => match self.blog_pane {
                BlogPane::Posts => {
                    let id = self.visible_posts().get(self.selected_post).map(|p| p.id);
                    if let Some(id) = id {
                        self.open_article(id);
                    }
                }
                BlogPane::Categories => {
                    let name = self
                        .categories()
                        .get(self.selected_category)
                        .map(|(name, _)| name.clone());
                    if let Some(name) = name {
                        self.filters.toggle_category(&name);
                        self.clamp_blog_selection();
                    }
                }
                BlogPane::Tags => {
                    let name = self.tags().get(self.selected_tag).cloned();
                    if let Some(name) = name {
                        self.filters.toggle_tag(&name);
                        self.clamp_blog_selection();
                    }
                }
            },
            View::Users => self.start_edit(),
            View::Article | View::Pricing => {}
        }
    }

    /// Resolve an article id against the loaded feed and switch to the
    /// article view. A miss still opens the view, carrying no blocks.
    pub fn open_article(&mut self, id: u64) {
        let blocks = match feed::find_post(self.feed.posts(), id) {
            Ok(post) => Some(match &post.content {
                Some(content) => parse_blocks(content),
                // No long-form content: show the excerpt as-is.
                None => vec![Block::Paragraph(vec![Run::Plain(post.excerpt.clone())])],
            }),
            Err(_) => None,
        };
        self.article = Some(Article { id, blocks });
        self.article_scroll = 0;
        self.view = View::Article;
    }

    fn clamp_blog_selection(&mut self) {
        let posts = self.visible_posts().len();
        if self.selected_post >= posts {
            self.selected_post = posts.saturating_sub(1);
        }
        let categories = self.categories().len();
        if self.selected_category >= categories {
            self.selected_category = categories.saturating_sub(1);
        }
        let tags = self.tags().len();
        if self.selected_tag >= tags {
            self.selected_tag = tags.saturating_sub(1);
        }
    }

    // ---- admin view ---------------------------------------------------------

    /// Enter the users view. Gated on the configured session; there is
    /// no hidden current-user lookup anywhere.
    async fn open_admin(&mut self) {
        if !self.config.session.superuser {
            self.set_status("Admin requires a superuser session (see config)");
            return;
        }
        if self.users_api.is_none() {
            self.set_status("Set api_base in the config to enable the admin view");
            return;
        }
        self.view = View::Users;
        if matches!(self.users, UsersState::NotLoaded) {
            self.load_users().await;
        }
    }

    async fn load_users(&mut self) {
        let api = match &self.users_api {
            Some(api) => api.clone(),
            None => return,
        };
        match api.list_users(0, self.config.users_page_size).await {
            Ok(page) => {
                if self.selected_user >= page.data.len() {
                    self.selected_user = page.data.len().saturating_sub(1);
                }
                self.users = UsersState::Ready(page);
            }
            Err(e) => {
                warn!("users list failed: {}", e);
                self.users = UsersState::Failed(e.to_string());
            }
        }
    }

    fn start_edit(&mut self) {
        let user = match self.users.users().get(self.selected_user) {
            Some(user) => user.clone(),
            None => return,
        };
        self.edit_form = EditForm::from_user(&user);
        self.edit_user_id = Some(user.id);
        self.edit_field = 0;
        self.edit_errors.clear();
        self.popup = Popup::EditUser;
    }

    fn start_delete(&mut self) {
        if let Some(user) = self.users.users().get(self.selected_user) {
            self.delete_target = Some((user.id.clone(), user.email.clone()));
            self.popup = Popup::ConfirmDelete;
        }
    }

    async fn confirm_delete(&mut self) {
        let (id, label) = match self.delete_target.take() {
            Some(target) => target,
            None => return,
        };
        let api = match &self.users_api {
            Some(api) => api.clone(),
            None => return,
        };
        match api.delete_user(&id).await {
            Ok(()) => {
                info!("deleted user {}", label);
                self.set_status("User deleted successfully");
                self.notify("User deleted", &format!("Removed {}", label));
                self.load_users().await;
            }
            Err(e) => {
                warn!("delete failed: {}", e);
                self.set_status(format!("Delete failed: {}", e));
                self.notify("Delete failed", &e.to_string());
            }
        }
    }

    // ---- edit popup ---------------------------------------------------------

    async fn handle_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                // Cancel and close; nothing was sent.
                self.popup = Popup::None;
                self.edit_errors.clear();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.edit_field = (self.edit_field + 1) % EditField::ALL.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.edit_field = self
                    .edit_field
                    .checked_sub(1)
                    .unwrap_or(EditField::ALL.len() - 1);
            }
            KeyCode::F(2) => self.submit_edit().await,
            KeyCode::Enter => {
                if self.current_field().is_flag() {
                    self.toggle_current_flag();
                } else {
                    // Move on, like tabbing out of the field.
                    self.edit_field = (self.edit_field + 1) % EditField::ALL.len();
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.current_buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(' ') if self.current_field().is_flag() => self.toggle_current_flag(),
            KeyCode::Char(c) => {
                if let Some(buffer) = self.current_buffer_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn current_field(&self) -> EditField {
        EditField::ALL[self.edit_field % EditField::ALL.len()]
    }

    fn current_buffer_mut(&mut self) -> Option<&mut String> {
        match self.current_field() {
            EditField::Email => Some(&mut self.edit_form.email),
            EditField::FullName => Some(&mut self.edit_form.full_name),
            EditField::Password => Some(&mut self.edit_form.password),
            EditField::ConfirmPassword => Some(&mut self.edit_form.confirm_password),
            _ => None,
        }
    }

    fn toggle_current_flag(&mut self) {
        let flag = match self.current_field() {
            EditField::Superuser => &mut self.edit_form.is_superuser,
            EditField::Active => &mut self.edit_form.is_active,
            EditField::HasSubscription => &mut self.edit_form.has_subscription,
            EditField::Trial => &mut self.edit_form.is_trial,
            EditField::Deactivated => &mut self.edit_form.is_deactivated,
            _ => return,
        };
        *flag = !*flag;
    }

    /// Validate locally, then send the update. Submission failures keep
    /// the popup open so nothing typed is lost.
    async fn submit_edit(&mut self) {
        let errors = self.edit_form.validate();
        if !errors.is_empty() {
            self.edit_errors = errors;
            return;
        }
        self.edit_errors.clear();

        let api = match &self.users_api {
            Some(api) => api.clone(),
            None => return,
        };
        let id = match &self.edit_user_id {
            Some(id) => id.clone(),
            None => return,
        };
        let payload = self.edit_form.payload();

        match api.update_user(&id, &payload).await {
            Ok(updated) => {
                info!("updated user {}", updated.email);
                self.popup = Popup::None;
                self.set_status("User updated successfully.");
                self.notify("User updated", &format!("Saved changes for {}", updated.email));
                self.load_users().await;
            }
            Err(e) => {
                warn!("user update failed: {}", e);
                self.set_status(format!("Update failed: {}", e));
                self.notify("Update failed", &e.to_string());
            }
        }
    }

    // ---- navigation popup ---------------------------------------------------

    async fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Collapse the open submenu first, then close.
                if self.open_menu.is_some() {
                    self.open_menu = None;
                } else {
                    self.popup = Popup::None;
                }
            }
            KeyCode::Char('m') | KeyCode::Char('q') => self.popup = Popup::None,
            KeyCode::Char('j') | KeyCode::Down => match self.open_menu {
                Some(open) => {
                    let len = self
                        .nav_items
                        .get(open)
                        .map(|item| item.sub_items.len())
                        .unwrap_or(0);
                    if len > 0 {
                        self.menu_sub_index = (self.menu_sub_index + 1) % len;
                    }
                }
                None => {
                    if !self.nav_items.is_empty() {
                        self.menu_index = (self.menu_index + 1) % self.nav_items.len();
                    }
                }
            },
            KeyCode::Char('k') | KeyCode::Up => match self.open_menu {
                Some(open) => {
                    let len = self
                        .nav_items
                        .get(open)
                        .map(|item| item.sub_items.len())
                        .unwrap_or(0);
                    if len > 0 {
                        self.menu_sub_index =
                            self.menu_sub_index.checked_sub(1).unwrap_or(len - 1);
                    }
                }
                None => {
                    if !self.nav_items.is_empty() {
                        self.menu_index =
                            self.menu_index.checked_sub(1).unwrap_or(self.nav_items.len() - 1);
                    }
                }
            },
            KeyCode::Enter | KeyCode::Char(' ') => match self.open_menu {
                Some(open) => {
                    let sub = self
                        .nav_items
                        .get(open)
                        .and_then(|item| item.sub_items.get(self.menu_sub_index))
                        .cloned();
                    if let Some(sub) = sub {
                        self.popup = Popup::None;
                        self.open_menu = None;
                        self.set_status(format!("{}: {}", sub.title, sub.path));
                    }
                }
                None => {
                    let target = self
                        .nav_items
                        .get(self.menu_index)
                        .map(|item| (item.path, item.sub_items.is_empty()));
                    match target {
                        Some((_, false)) => {
                            // One submenu open at a time.
                            self.open_menu = Some(self.menu_index);
                            self.menu_sub_index = 0;
                        }
                        Some((Some("/admin"), true)) => {
                            self.popup = Popup::None;
                            self.open_admin().await;
                        }
                        Some((Some(path), true)) => {
                            self.popup = Popup::None;
                            self.set_status(format!("See {} on the dashboard", path));
                        }
                        _ => {}
                    }
                }
            },
            _ => {}
        }
    }

    // ---- shared -------------------------------------------------------------

    /// Re-run the load behind the current view. Never automatic; this
    /// only happens on the refresh key.
    pub async fn refresh(&mut self) {
        match self.view {
            View::Users => {
                self.load_users().await;
                self.set_status("Users refreshed");
            }
            View::Blog | View::Article | View::Pricing => {
                match feed::fetch_posts(&self.http, &self.config.feed_url).await {
                    Ok(posts) => {
                        self.feed = FeedState::Ready(posts);
                        self.clamp_blog_selection();
                        // An open article re-resolves against the fresh set.
                        if self.view == View::Article {
                            if let Some(article) = &self.article {
                                let id = article.id;
                                self.open_article(id);
                            }
                        }
                        self.set_status("Feed refreshed");
                    }
                    Err(e) => {
                        warn!("feed refresh failed: {}", e);
                        self.feed = FeedState::Failed(e.to_string());
                    }
                }
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Clear the status message after 3 seconds.
    pub fn tick(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn notify(&self, summary: &str, body: &str) {
        if !self.config.notifications {
            return;
        }
        let _ = notify_rust::Notification::new()
            .summary(summary)
            .body(body)
            .icon("internet-web-browser")
            .show();
    }
}
