//! The product navigation tree. Session identity comes in as an
//! explicit argument; nothing here consults global state to decide
//! what a user may see.

use crate::config::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItem {
    pub title: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// Direct destination for items without a submenu.
    pub path: Option<&'static str>,
    pub sub_items: Vec<SubItem>,
}

/// The menu tree for one session. Superusers get an Admin entry
/// appended, at most once; everyone else sees the public tree only.
pub fn build_nav(session: &Session) -> Vec<NavItem> {
    let mut items = base_nav();
    if session.superuser && !items.iter().any(|item| item.title == "Admin") {
        items.push(NavItem {
            title: "Admin",
            icon: "",
            description: "Manage user accounts",
            path: Some("/admin"),
            sub_items: Vec::new(),
        });
    }
    items
}

fn base_nav() -> Vec<NavItem> {
    vec![
        NavItem {
            title: "Web Scraping Tools",
            icon: "",
            description: "Professional web scraping tools and proxies for data collection",
            path: None,
            sub_items: vec![
                SubItem {
                    title: "HTML Scraper",
                    path: "/tools/html-scraper",
                    description: "Extract data from HTML websites with precision",
                },
                SubItem {
                    title: "API Scraper",
                    path: "/tools/api-scraper",
                    description: "Collect data from APIs with reliable proxies",
                },
                SubItem {
                    title: "Proxy Dashboard",
                    path: "/tools/proxy-dashboard",
                    description: "Monitor and manage your web scraping proxies",
                },
                SubItem {
                    title: "Scheduler",
                    path: "/tools/scheduler",
                    description: "Automate your web scraping jobs with scheduling",
                },
            ],
        },
        NavItem {
            title: "Data Solutions",
            icon: "",
            description: "Data extraction and processing solutions for businesses",
            path: None,
            sub_items: vec![
                SubItem {
                    title: "Market Research",
                    path: "/solutions/market-research",
                    description: "Collect market data through web scraping",
                },
                SubItem {
                    title: "Price Monitoring",
                    path: "/solutions/price-monitoring",
                    description: "Track competitor pricing across websites",
                },
                SubItem {
                    title: "AI Training Data",
                    path: "/solutions/training-ai",
                    description: "Build machine learning datasets through web scraping",
                },
                SubItem {
                    title: "Content Aggregation",
                    path: "/solutions/content-aggregation",
                    description: "Gather content from multiple web sources",
                },
            ],
        },
        NavItem {
            title: "Global Proxy Network",
            icon: "󰖟",
            description: "Worldwide proxy infrastructure for web scraping",
            path: None,
            sub_items: vec![
                SubItem {
                    title: "Proxy Locations",
                    path: "/network/locations",
                    description: "Browse our global proxy server locations",
                },
                SubItem {
                    title: "Network Status",
                    path: "/network/status",
                    description: "Check real-time proxy performance and availability",
                },
                SubItem {
                    title: "Security Features",
                    path: "/network/security",
                    description: "Learn about our proxy security protocols",
                },
                SubItem {
                    title: "Proxy Types",
                    path: "/network/proxy-types",
                    description: "Different proxy types for various scraping needs",
                },
            ],
        },
        NavItem {
            title: "Resources",
            icon: "",
            description: "Documentation and learning resources for web scraping",
            path: None,
            sub_items: vec![
                SubItem {
                    title: "API Documentation",
                    path: "https://apis.postern.dev/redoc",
                    description: "Technical documentation for our scraping APIs",
                },
                SubItem {
                    title: "Web Scraping Guides",
                    path: "/resources/web-scraping-guides",
                    description: "Learn how to use our web scraping tools effectively",
                },
                SubItem {
                    title: "Code Examples",
                    path: "/resources/code-examples",
                    description: "Sample code for web scraping in multiple languages",
                },
                SubItem {
                    title: "Support Center",
                    path: "/resources/support-center",
                    description: "Get help with your web scraping projects",
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_sessions_see_the_public_tree() {
        let session = Session::default();
        let items = build_nav(&session);
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| item.title != "Admin"));
        assert!(items.iter().all(|item| item.sub_items.len() == 4));
    }

    #[test]
    fn superusers_get_admin_appended_once() {
        let session = Session {
            email: Some("root@example.com".to_string()),
            superuser: true,
        };
        let items = build_nav(&session);
        assert_eq!(items.len(), 5);
        assert_eq!(items.last().map(|item| item.title), Some("Admin"));
        assert_eq!(items.iter().filter(|item| item.title == "Admin").count(), 1);
    }
}
