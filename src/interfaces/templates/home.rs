use crate::{interfaces::templates::layout::Page, utils::markdown::escape};

pub fn home_page(page: &Page) -> String {
    let socials: String = page
        .site
        .socials
        .iter()
        .map(|link| {
            format!(
                r#"<a class="social {network}" href="{url}" target="_blank" rel="noopener">{label}</a>
"#,
                network = escape(&link.network),
                url = escape(&link.url),
                label = escape(&link.network),
            )
        })
        .collect();

    page.render(&format!(
        r#"<div class="home text-center">
<h1>{brand}</h1>
<div class="socials">
{socials}</div>
<div class="page-buttons">
<a class="btn btn-outline-dark page-btn" id="blog-button" href="/blog/">My Blog</a>
<a class="btn btn-outline-dark page-btn" id="cv-button" href="/cv/">Interactive CV</a>
</div>
</div>"#,
        brand = escape(&page.site.brand),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SiteConfig;

    #[test]
    fn home_lists_every_social_network() {
        let site = SiteConfig::default();
        let html = home_page(&Page::anonymous(&site));

        assert!(html.contains("<h1>Zenith</h1>"));
        for network in ["twitter", "instagram", "spotify", "linkedin", "github"] {
            assert!(html.contains(&format!(r#"class="social {network}""#)), "{network} missing");
        }
        assert!(html.contains(&escape("https://github.com/WillEdMatsypie")));
        assert!(html.contains(">My Blog</a>"));
        assert!(html.contains(">Interactive CV</a>"));
    }
}
