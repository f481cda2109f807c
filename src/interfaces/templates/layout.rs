use chrono::{DateTime, Utc};

use crate::{entities::token::Claims, settings::SiteConfig, utils::markdown::escape};

const BOOTSTRAP_CSS: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.3.1/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.3.1/js/bootstrap.bundle.min.js";
const JQUERY_JS: &str = "https://code.jquery.com/jquery-3.3.1.slim.min.js";

/// Who is looking at a page, and the site it belongs to.
#[derive(Clone, Copy)]
pub struct Page<'a> {
    pub site: &'a SiteConfig,
    pub user: Option<&'a Claims>,
}

impl<'a> Page<'a> {
    pub fn new(site: &'a SiteConfig, user: Option<&'a Claims>) -> Self {
        Page { site, user }
    }

    pub fn anonymous(site: &'a SiteConfig) -> Self {
        Page { site, user: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Wraps page content in the shared document, navbar included.
    pub fn render(&self, content: &str) -> String {
        format!(
            r#"<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{BOOTSTRAP_CSS}">
</head>
<body>
<nav class="navbar navbar-expand-lg navbar-dark bg-dark">
<a class="navbar-brand" href="/">{brand}</a>
<ul class="navbar-nav mr-auto">
<li class="nav-item"><a class="nav-link" href="/blog/">Blog</a></li>
<li class="nav-item"><a class="nav-link" href="/cv/">CV</a></li>
</ul>
{account}
</nav>
<div class="container content">
{content}
</div>
<script src="{JQUERY_JS}"></script>
<script src="{BOOTSTRAP_JS}"></script>
</body>
</html>"#,
            title = escape(&self.site.page_title()),
            brand = escape(&self.site.brand),
            account = self.account_links(),
        )
    }

    fn account_links(&self) -> String {
        match self.user {
            Some(claims) => format!(
                r#"<ul class="navbar-nav">
<li class="nav-item"><span class="navbar-text mr-3">{}</span></li>
<li class="nav-item"><a class="nav-link" id="drafts" href="/blog/drafts/">Drafts</a></li>
<li class="nav-item"><a class="nav-link" id="logout" href="/accounts/logout/">Log out</a></li>
</ul>"#,
                escape(&claims.username)
            ),
            None => r#"<ul class="navbar-nav">
<li class="nav-item"><a class="nav-link" id="login" href="/accounts/login/">Log in</a></li>
</ul>"#
                .to_string(),
        }
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y, %H:%M").to_string()
}
