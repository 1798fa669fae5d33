mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect, Alignment},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, BlogPane, EditField, Popup, UsersState, View};
use crate::feed;
use crate::pricing::{self, Product};
use crate::theme::Theme;

// Palette is resolved from the config once, before the first frame
static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the palette. Later calls are ignored.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),               // Tab bar
            Constraint::Length(1),               // Info line
            Constraint::Min(10),                 // Current view
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    draw_tab_bar(f, app, chunks[0]);
    draw_info_line(f, app, chunks[1]);
    match app.view {
        View::Blog => draw_blog(f, app, chunks[2]),
        View::Article => draw_article(f, app, chunks[2]),
        View::Pricing => draw_pricing(f, app, chunks[2]),
        View::Users => draw_users(f, app, chunks[2]),
    }
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Menu => draw_menu_popup(f, app),
        Popup::EditUser => draw_edit_popup(f, app),
        Popup::ConfirmDelete => draw_confirm_popup(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" postern ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
        Span::styled("│", Style::default().fg(inactive())),
    ];

    let mut tabs: Vec<(View, &str)> = vec![(View::Blog, "1 Blog"), (View::Pricing, "2 Pricing")];
    if app.config.session.superuser {
        tabs.push((View::Users, "3 Admin"));
    }

    for (view, label) in tabs {
        // The article view belongs to the blog tab
        let selected = app.view == view || (view == View::Blog && app.view == View::Article);
        let style = if selected {
            Style::default().fg(header()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    }

    if let Some(ref email) = app.config.session.email {
        spans.push(Span::styled("│ ", Style::default().fg(inactive())));
        spans.push(Span::styled(email, Style::default().fg(text_dim())));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > active filters > ready
    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![
            Span::styled(status, Style::default().fg(warning())),
        ])
    } else if app.view == View::Blog && !app.filters.is_empty() {
        let mut parts = Vec::new();
        if let Some(ref category) = app.filters.category {
            parts.push(format!("category: {}", category));
        }
        if !app.filters.tags.is_empty() {
            parts.push(format!("tags: {}", app.filters.tags.join(", ")));
        }
        Line::from(vec![
            Span::styled(format!("Filtering by {}", parts.join(" │ ")), Style::default().fg(text_dim())),
        ])
    } else {
        Line::from(vec![
            Span::styled("Ready", Style::default().fg(text_dim())),
        ])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_blog(f: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = app.feed.error() {
        let block = Block::default()
            .title(Span::styled(" Blog ", Style::default().fg(danger())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(danger()));

        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Could not load the blog feed.",
                Style::default().fg(danger()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(error, Style::default().fg(text_dim()))),
            Line::from(""),
            Line::from(vec![
                Span::styled("R", Style::default().fg(accent())),
                Span::styled(" retry", Style::default().fg(text_dim())),
            ]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(message, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(72),          // Post list
            Constraint::Percentage(28),          // Filter sidebar
        ])
        .split(area);

    draw_posts_box(f, app, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[1]);
    draw_categories_box(f, app, side[0]);
    draw_tags_box(f, app, side[1]);
}

fn draw_posts_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.blog_pane == BlogPane::Posts;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let posts = app.visible_posts();
    let total = app.feed.posts().len();
    let title = if posts.len() == total {
        format!(" Posts ({}) ", total)
    } else {
        format!(" Posts ({}/{}) ", posts.len(), total)
    };

    let block = Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    // Responsive columns based on width
    let show_meta = area.width > 70;

    let header = if show_meta {
        Row::new(vec![
            Span::styled("", Style::default().fg(header())),
            Span::styled("Title", Style::default().fg(header())),
            Span::styled("Category", Style::default().fg(header())),
            Span::styled("Date", Style::default().fg(header())),
            Span::styled("Read", Style::default().fg(header())),
        ])
    } else {
        Row::new(vec![
            Span::styled("", Style::default().fg(header())),
            Span::styled("Title", Style::default().fg(header())),
            Span::styled("Category", Style::default().fg(header())),
        ])
    };

    let rows: Vec<Row> = if posts.is_empty() {
        let empty = if total == 0 {
            "  The feed is empty"
        } else {
            "  No posts match the active filters"
        };
        vec![Row::new(vec![
            Span::styled(empty, Style::default().fg(text_dim())),
        ])]
    } else {
        // The first two feed entries carry the featured marker
        let featured: Vec<u64> = feed::featured(app.feed.posts()).iter().map(|p| p.id).collect();
        posts
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let (icon, icon_color) = if featured.contains(&post.id) {
                    ("★", warning())
                } else {
                    (" ", text_dim())
                };

                let row_style = if i == app.selected_post && is_active {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };

                if show_meta {
                    Row::new(vec![
                        Span::styled(icon, Style::default().fg(icon_color)),
                        Span::styled(post.display_title(), Style::default().fg(text())),
                        Span::styled(post.display_category(), Style::default().fg(text_dim())),
                        Span::styled(post.display_date(), Style::default().fg(text_dim())),
                        Span::styled(post.display_read_time(), Style::default().fg(text_dim())),
                    ])
                    .style(row_style)
                } else {
                    Row::new(vec![
                        Span::styled(icon, Style::default().fg(icon_color)),
                        Span::styled(post.display_title(), Style::default().fg(text())),
                        Span::styled(post.display_category(), Style::default().fg(text_dim())),
                    ])
                    .style(row_style)
                }
            })
            .collect()
    };

    let widths = if show_meta {
        vec![
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Percentage(22),
            Constraint::Percentage(18),
            Constraint::Percentage(12),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Percentage(62),
            Constraint::Percentage(33),
        ]
    };

    let table = Table::new(rows, widths)
        .header(header.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

fn draw_categories_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.blog_pane == BlogPane::Categories;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let block = Block::default()
        .title(Span::styled(" Categories ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let categories = app.categories();
    let rows: Vec<Row> = if categories.is_empty() {
        vec![Row::new(vec![
            Span::styled("  No categories yet", Style::default().fg(text_dim())),
        ])]
    } else {
        categories
            .iter()
            .enumerate()
            .map(|(i, (name, count))| {
                let chosen = app.filters.category.as_deref() == Some(name.as_str());
                let marker = if chosen { "●" } else { " " };

                let row_style = if i == app.selected_category && is_active {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };

                Row::new(vec![
                    Span::styled(marker, Style::default().fg(accent())),
                    Span::styled(name.as_str(), Style::default().fg(text())),
                    Span::styled(format!("{}", count), Style::default().fg(text_dim())),
                ])
                .style(row_style)
            })
            .collect()
    };

    let widths = vec![
        Constraint::Length(2),
        Constraint::Percentage(75),
        Constraint::Percentage(15),
    ];

    let table = Table::new(rows, widths).block(block);
    f.render_widget(table, area);
}

fn draw_tags_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.blog_pane == BlogPane::Tags;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let block = Block::default()
        .title(Span::styled(" Tags ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let tags = app.tags();
    let rows: Vec<Row> = if tags.is_empty() {
        vec![Row::new(vec![
            Span::styled("  No tags yet", Style::default().fg(text_dim())),
        ])]
    } else {
        tags.iter()
            .enumerate()
            .map(|(i, name)| {
                let chosen = app.filters.tags.iter().any(|t| t == name);
                let marker = if chosen { "●" } else { " " };

                let row_style = if i == app.selected_tag && is_active {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };

                Row::new(vec![
                    Span::styled(marker, Style::default().fg(accent())),
                    Span::styled(name.as_str(), Style::default().fg(text())),
                ])
                .style(row_style)
            })
            .collect()
    };

    let widths = vec![Constraint::Length(2), Constraint::Percentage(95)];
    let table = Table::new(rows, widths).block(block);
    f.render_widget(table, area);
}

fn draw_article(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Article ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let article = match app.article {
        Some(ref article) => article,
        None => {
            let empty = Paragraph::new("No article open")
                .style(Style::default().fg(text_dim()))
                .block(block);
            f.render_widget(empty, area);
            return;
        }
    };

    let blocks = match article.blocks {
        Some(ref blocks) => blocks,
        None => {
            // The id is not in the loaded feed
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Post Not Found",
                    Style::default().fg(danger()).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "The blog post you're looking for doesn't exist.",
                    Style::default().fg(text_dim()),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Esc", Style::default().fg(accent())),
                    Span::styled(" back to the blog", Style::default().fg(text_dim())),
                ]),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(message, area);
            return;
        }
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Ok(post) = feed::find_post(app.feed.posts(), article.id) {
        lines.push(Line::from(Span::styled(
            post.display_title(),
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled(post.display_category(), Style::default().fg(accent())),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(post.display_date(), Style::default().fg(text_dim())),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(post.display_read_time(), Style::default().fg(text_dim())),
        ]));
        if !post.tags.is_empty() {
            lines.push(Line::from(Span::styled(
                post.tags.join(", "),
                Style::default().fg(text_dim()),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.extend(components::content_lines(
        blocks,
        Style::default().fg(text()),
        Style::default().fg(header()),
    ));

    let scroll = app.article_scroll.min(lines.len().saturating_sub(1)) as u16;
    let content = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(content, area);
}

fn draw_pricing(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Product tabs
            Constraint::Min(8),                  // Plan table
            Constraint::Length(5),               // Perks
        ])
        .split(area);

    let mut tab_spans: Vec<Span> = Vec::new();
    for (i, product) in Product::ALL.iter().enumerate() {
        let style = if i == app.selected_product {
            Style::default().fg(accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        };
        tab_spans.push(Span::styled(
            format!(" {} {} ", product.icon(), product.label()),
            style,
        ));
        if i + 1 < Product::ALL.len() {
            tab_spans.push(Span::styled("│", Style::default().fg(inactive())));
        }
    }
    let tabs = Paragraph::new(Line::from(tab_spans)).alignment(Alignment::Center);
    f.render_widget(tabs, chunks[0]);

    let product = app.current_product();
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Pricing ", product.label()),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let table_header = Row::new(vec![
        Span::styled("Plan", Style::default().fg(header())),
        Span::styled("Price / GB", Style::default().fg(header())),
        Span::styled("Traffic limit", Style::default().fg(header())),
        Span::styled("", Style::default().fg(header())),
    ]);

    let rows: Vec<Row> = product
        .tiers()
        .iter()
        .map(|tier| {
            let name_cell = match tier.badge {
                Some(badge) => Cell::from(Line::from(vec![
                    Span::styled(tier.name, Style::default().fg(text()).add_modifier(Modifier::BOLD)),
                    Span::raw(" "),
                    Span::styled(badge, Style::default().fg(warning()).add_modifier(Modifier::BOLD)),
                ])),
                None => Cell::from(Span::styled(tier.name, Style::default().fg(text()))),
            };
            let price_color = if tier.is_custom() { text_dim() } else { success() };
            Row::new(vec![
                name_cell,
                Cell::from(Span::styled(tier.price_per_gb, Style::default().fg(price_color))),
                Cell::from(Span::styled(tier.traffic_limit, Style::default().fg(text()))),
                Cell::from(Span::styled(tier.action(), Style::default().fg(accent()))),
            ])
        })
        .collect();

    let widths = vec![
        Constraint::Percentage(35),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(table_header.style(Style::default()))
        .block(block);
    f.render_widget(table, chunks[1]);

    let perks_block = Block::default()
        .title(Span::styled(" Included with every plan ", Style::default().fg(inactive())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let perk_lines: Vec<Line> = pricing::PERKS
        .iter()
        .map(|(title, detail)| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(success())),
                Span::styled(*title, Style::default().fg(text()).add_modifier(Modifier::BOLD)),
                Span::styled(": ", Style::default().fg(text_dim())),
                Span::styled(*detail, Style::default().fg(text_dim())),
            ])
        })
        .collect();

    let perks = Paragraph::new(perk_lines)
        .wrap(Wrap { trim: true })
        .block(perks_block);
    f.render_widget(perks, chunks[2]);
}

fn draw_users(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Users ({}) ", app.users.total()),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let page = match app.users {
        UsersState::Ready(ref page) => page,
        UsersState::NotLoaded => {
            let loading = Paragraph::new("Loading users")
                .style(Style::default().fg(text_dim()))
                .block(block);
            f.render_widget(loading, area);
            return;
        }
        UsersState::Failed(ref error) => {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Could not load users.",
                    Style::default().fg(danger()).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(error, Style::default().fg(text_dim()))),
                Line::from(""),
                Line::from(vec![
                    Span::styled("R", Style::default().fg(accent())),
                    Span::styled(" retry", Style::default().fg(text_dim())),
                ]),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            f.render_widget(message, area);
            return;
        }
    };

    let table_header = Row::new(vec![
        Span::styled("Email", Style::default().fg(header())),
        Span::styled("Name", Style::default().fg(header())),
        Span::styled("Active", Style::default().fg(header())),
        Span::styled("Admin", Style::default().fg(header())),
        Span::styled("Subscription", Style::default().fg(header())),
        Span::styled("Expiry", Style::default().fg(header())),
    ]);

    let rows: Vec<Row> = if page.data.is_empty() {
        vec![Row::new(vec![
            Span::styled("  No users found", Style::default().fg(text_dim())),
        ])]
    } else {
        page.data
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let (active_mark, active_color) = if user.is_active {
                    ("✓", success())
                } else {
                    ("✗", danger())
                };
                let (admin_mark, admin_color) = if user.is_superuser {
                    ("✓", success())
                } else {
                    ("-", text_dim())
                };
                let (subscription, subscription_color) = if user.has_subscription {
                    if user.is_expired() {
                        ("Expired", danger())
                    } else {
                        ("Active", success())
                    }
                } else if user.is_trial {
                    ("Trial", warning())
                } else {
                    ("-", text_dim())
                };
                let expiry = match user.expiry_date.as_deref() {
                    Some(raw) => raw.split('T').next().unwrap_or(raw),
                    None => "-",
                };
                let email_color = if user.is_deactivated { text_dim() } else { text() };

                let row_style = if i == app.selected_user {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };

                Row::new(vec![
                    Span::styled(&user.email, Style::default().fg(email_color)),
                    Span::styled(user.display_name(), Style::default().fg(text_dim())),
                    Span::styled(active_mark, Style::default().fg(active_color)),
                    Span::styled(admin_mark, Style::default().fg(admin_color)),
                    Span::styled(subscription, Style::default().fg(subscription_color)),
                    Span::styled(expiry, Style::default().fg(text_dim())),
                ])
                .style(row_style)
            })
            .collect()
    };

    let widths = vec![
        Constraint::Percentage(30),
        Constraint::Percentage(22),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Percentage(14),
        Constraint::Percentage(16),
    ];

    let table = Table::new(rows, widths)
        .header(table_header.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.view {
        View::Blog => vec![
            ("↑↓", "Nav"),
            ("Tab", "Pane"),
            ("Enter", "Open"),
            ("R", "Refresh"),
            ("m", "Menu"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        View::Article => vec![
            ("↑↓", "Scroll"),
            ("Esc", "Back"),
            ("R", "Refresh"),
            ("m", "Menu"),
            ("q", "Quit"),
        ],
        View::Pricing => vec![
            ("←→", "Product"),
            ("m", "Menu"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        View::Users => vec![
            ("↑↓", "Nav"),
            ("Enter", "Edit"),
            ("d", "Del"),
            ("R", "Refresh"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 5 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_menu_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 90 } else { 60 },
        if area.height < 30 { 85 } else { 70 },
        area
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Navigation ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(popup_area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, item) in app.nav_items.iter().enumerate() {
        let is_open = app.open_menu == Some(i);
        let selected = app.open_menu.is_none() && i == app.menu_index;
        let marker = if is_open { "▾" } else { "▸" };

        let row_style = if selected {
            Style::default().bg(bg_selected())
        } else {
            Style::default()
        };
        lines.push(
            Line::from(vec![
                Span::styled(format!(" {} ", marker), Style::default().fg(accent())),
                Span::styled(format!("{} ", item.icon), Style::default().fg(accent())),
                Span::styled(item.title, Style::default().fg(text()).add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", item.description), Style::default().fg(text_dim())),
            ])
            .style(row_style),
        );

        if is_open {
            for (j, sub) in item.sub_items.iter().enumerate() {
                let sub_selected = j == app.menu_sub_index;
                let sub_style = if sub_selected {
                    Style::default().bg(bg_selected())
                } else {
                    Style::default()
                };
                lines.push(
                    Line::from(vec![
                        Span::styled("     ", Style::default()),
                        Span::styled(sub.title, Style::default().fg(text())),
                        Span::styled(format!("  {}", sub.description), Style::default().fg(text_dim())),
                    ])
                    .style(sub_style),
                );
            }
        }
    }
    f.render_widget(Paragraph::new(lines), inner[0]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("j/k", Style::default().fg(accent())),
        Span::raw(" nav │ "),
        Span::styled("Enter", Style::default().fg(accent())),
        Span::raw(" open │ "),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::raw(" close"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(text_dim()));
    f.render_widget(hint, inner[1]);
}

fn draw_edit_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 100 { 90 } else { 60 },
        if area.height < 35 { 95 } else { 80 },
        area
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled("  Edit User ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),               // Email
            Constraint::Length(3),               // Full name
            Constraint::Length(3),               // Password
            Constraint::Length(3),               // Confirm password
            Constraint::Length(5),               // Flags
            Constraint::Min(2),                  // Validation errors
            Constraint::Length(3),               // Buttons
        ])
        .split(popup_area);

    let focused = app.current_field();
    draw_edit_text_field(f, inner[0], EditField::Email.label(), &app.edit_form.email, focused == EditField::Email, false);
    draw_edit_text_field(f, inner[1], EditField::FullName.label(), &app.edit_form.full_name, focused == EditField::FullName, false);
    draw_edit_text_field(f, inner[2], EditField::Password.label(), &app.edit_form.password, focused == EditField::Password, true);
    draw_edit_text_field(f, inner[3], EditField::ConfirmPassword.label(), &app.edit_form.confirm_password, focused == EditField::ConfirmPassword, true);

    let flags = [
        (EditField::Superuser, app.edit_form.is_superuser),
        (EditField::Active, app.edit_form.is_active),
        (EditField::HasSubscription, app.edit_form.has_subscription),
        (EditField::Trial, app.edit_form.is_trial),
        (EditField::Deactivated, app.edit_form.is_deactivated),
    ];
    let flag_lines: Vec<Line> = flags
        .iter()
        .map(|(field, value)| {
            let mark = if *value { "[x]" } else { "[ ]" };
            let mark_color = if *value { success() } else { text_dim() };
            let row_style = if focused == *field {
                Style::default().bg(bg_selected())
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!(" {} ", mark), Style::default().fg(mark_color)),
                Span::styled(field.label(), Style::default().fg(text())),
            ])
            .style(row_style)
        })
        .collect();
    f.render_widget(Paragraph::new(flag_lines), inner[4]);

    let error_lines: Vec<Line> = if app.edit_errors.is_empty() {
        vec![Line::from(Span::styled(
            " Space toggles flags",
            Style::default().fg(text_dim()),
        ))]
    } else {
        app.edit_errors
            .iter()
            .map(|error| {
                Line::from(vec![
                    Span::styled(" ✗ ", Style::default().fg(danger())),
                    Span::styled(error, Style::default().fg(danger())),
                ])
            })
            .collect()
    };
    f.render_widget(Paragraph::new(error_lines).wrap(Wrap { trim: true }), inner[5]);

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled("  [ ", Style::default().fg(text_dim())),
        Span::styled("F2 = Save", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
        Span::styled(" ]  [ ", Style::default().fg(text_dim())),
        Span::styled("Tab = Next Field", Style::default().fg(accent())),
        Span::styled(" ]  [ ", Style::default().fg(text_dim())),
        Span::styled("Esc = Cancel", Style::default().fg(danger())),
        Span::styled(" ]  ", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(inactive())),
    );
    f.render_widget(buttons, inner[6]);
}

fn draw_edit_text_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool, masked: bool) {
    let border = if focused { accent() } else { inactive() };
    let cursor = if focused { "_" } else { "" };
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let input = Paragraph::new(format!("{}{}", shown, cursor))
        .style(Style::default().fg(text()))
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", label), Style::default().fg(if focused { accent() } else { header() })))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(input, area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(44, 20, f.area());

    f.render_widget(Clear, popup_area);

    let message = match app.delete_target {
        Some((_, ref label)) => format!("Delete user {}?", label),
        None => "Confirm?".to_string(),
    };

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 85 },
        area
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ Views ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  1         ", Style::default().fg(accent())),
            Span::raw("Blog feed"),
        ]),
        Line::from(vec![
            Span::styled("  2         ", Style::default().fg(accent())),
            Span::raw("Proxy pricing plans"),
        ]),
        Line::from(vec![
            Span::styled("  3         ", Style::default().fg(accent())),
            Span::raw("User admin (superuser sessions only)"),
        ]),
        Line::from(vec![
            Span::styled("  m         ", Style::default().fg(accent())),
            Span::raw("Site navigation menu"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Blog ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Tab       ", Style::default().fg(accent())),
            Span::raw("Switch panes (Posts → Categories → Tags)"),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", Style::default().fg(accent())),
            Span::raw("Move up/down in lists"),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Open post / toggle category or tag filter"),
        ]),
        Line::from(vec![
            Span::styled("  R         ", Style::default().fg(accent())),
            Span::raw("Reload the feed"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Article ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  j/k       ", Style::default().fg(accent())),
            Span::raw("Scroll, PgUp/PgDn for pages"),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", Style::default().fg(accent())),
            Span::raw("Back to the post list"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Admin ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Edit the selected user"),
        ]),
        Line::from(vec![
            Span::styled("  d         ", Style::default().fg(accent())),
            Span::raw("Delete the selected user"),
        ]),
        Line::from(vec![
            Span::styled("  F2        ", Style::default().fg(accent())),
            Span::raw("Save the edit form"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Quick Start ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  postern              ", Style::default().fg(accent())),
            Span::raw("Launch this TUI"),
        ]),
        Line::from(vec![
            Span::styled("  postern --json       ", Style::default().fg(accent())),
            Span::raw("Print the feed as JSON for scripts"),
        ]),
        Line::from(vec![
            Span::styled("  postern --post <id>  ", Style::default().fg(accent())),
            Span::raw("Render one post to stdout"),
        ]),
        Line::from(vec![
            Span::styled("  postern --plans      ", Style::default().fg(accent())),
            Span::raw("Print the pricing tables"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 postern Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
