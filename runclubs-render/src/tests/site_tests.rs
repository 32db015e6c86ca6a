use std::collections::BTreeMap;
use std::fs;

use super::*;
use crate::html::BuiltinTemplates;
use runclubs_core::{City, Club, LatLon};

fn sample_data() -> Data {
    let mut data = Data::new();
    data.last_update = "2024-06-01 12:00:00".to_string();

    let berlin = data.add_city(City::new("Berlin", 0));
    let hamburg = data.add_city(City::new("Hamburg", 1));
    let tiny = data.add_city(City::new("Kleinstadt", 11));
    data.city_mut(berlin).coords = Some(LatLon::new(52.52, 13.405));

    let club = Club {
        name: "Run & Fun".to_string(),
        description: "<b>Dienstags</b> am Tor".to_string(),
        coords: Some(LatLon::new(52.5163, 13.3777)),
        instagram: "https://instagram.com/runfun".to_string(),
        added: "2024-05-01".to_string(),
        ..Default::default()
    };
    let club = data.add_club(club, berlin);
    let tag = data.get_or_add_tag("night");
    data.tag_club(club, tag);

    data.sorted_cities = vec![berlin, hamburg, tiny];
    data.sorted_clubs = vec![club];
    data.sorted_tags = vec![tag];
    data.latest_clubs = vec![club];
    data.top_cities = vec![berlin];
    data.number_clubs = 1;
    data.city_mut(berlin).nearest_cities_no_club = Some(vec![hamburg, tiny]);
    data.redirect("/berlin/old-name", "/berlin/run-fun");
    data
}

fn site(out: &Path, target: LinkTarget) -> SiteContext {
    SiteContext {
        output_dir: out.to_path_buf(),
        base_url: "https://socialrunclubs.de".to_string(),
        target,
        submit_url: "https://forms.example/submit".to_string(),
        report_url: "https://forms.example/report?u=NAME".to_string(),
        css_files: vec!["/static/style-0011aabb.css".to_string()],
        js_files: vec!["/static/script-22334455.js".to_string()],
        umami_js: Some("/static/umami-66778899.js".to_string()),
        index_now: "abc123".to_string(),
    }
}

fn read(out: &Path, rel: &str) -> String {
    fs::read_to_string(out.join(rel)).unwrap()
}

#[test]
fn test_htaccess() {
    let mut redirects = BTreeMap::new();
    redirects.insert("/koeln/b".to_string(), "/koeln/c".to_string());
    redirects.insert("/berlin/a".to_string(), "/berlin/b".to_string());
    assert_eq!(
        htaccess(&redirects),
        "ErrorDocument 404 /404.html\n\nRedirect 301 /berlin/a /berlin/b\nRedirect 301 /koeln/b /koeln/c\n"
    );
    assert_eq!(htaccess(&BTreeMap::new()), "ErrorDocument 404 /404.html\n\n");
}

#[test]
fn test_sitemap() {
    let xml = sitemap(&["https://x.de/".to_string(), "https://x.de/?a=1&b=2".to_string()]);
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset "));
    assert!(xml.contains("xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\""));
    assert!(xml.contains("  <url>\n    <loc>https://x.de/</loc>\n  </url>\n"));
    assert!(xml.contains("<loc>https://x.de/?a=1&amp;b=2</loc>"));
    assert!(xml.ends_with("</urlset>\n"));
}

#[test]
fn test_render_site_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path();
    let data = sample_data();
    let site = site(out, LinkTarget::Remote);

    let summary = render_site(&data, &site, &BuiltinTemplates::new()).unwrap();

    for page in PAGES {
        assert!(out.join(page.out_file).is_file(), "{}", page.out_file);
    }
    assert!(out.join("berlin/index.html").is_file());
    assert!(out.join("berlin/run-fun/index.html").is_file());
    assert!(out.join("hamburg/index.html").is_file());
    assert!(!out.join("kleinstadt").exists());
    assert!(out.join("tag/night/index.html").is_file());
    assert!(out.join("404.html").is_file());
    assert_eq!(read(out, "abc123.txt"), "abc123");
    assert_eq!(
        read(out, ".htaccess"),
        "ErrorDocument 404 /404.html\n\nRedirect 301 /berlin/old-name /berlin/run-fun\n"
    );

    assert_eq!(summary.pages, PAGES.len() + 5);
    let tail: Vec<_> = summary.sitemap_urls[PAGES.len()..].to_vec();
    assert_eq!(
        tail,
        [
            "https://socialrunclubs.de/berlin/",
            "https://socialrunclubs.de/berlin/run-fun/",
            "https://socialrunclubs.de/hamburg/",
            "https://socialrunclubs.de/tag/night/",
        ]
    );
    assert_eq!(summary.sitemap_urls[0], "https://socialrunclubs.de/");
    let xml = read(out, "sitemap.xml");
    assert!(!xml.contains("404.html"));
    assert_eq!(xml.matches("<url>").count(), summary.sitemap_urls.len());
}

#[test]
fn test_club_page_content() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path();
    let data = sample_data();
    render_site(&data, &site(out, LinkTarget::Remote), &BuiltinTemplates::new()).unwrap();

    let html = read(out, "berlin/run-fun/index.html");
    assert!(html.contains("<title>Run &amp; Fun - ein Social Run Club in Berlin</title>"));
    assert!(html.contains("<link rel=\"canonical\" href=\"https://socialrunclubs.de/berlin/run-fun/\">"));
    assert!(html.contains("<b>Dienstags</b> am Tor"));
    assert!(html.contains("href=\"https://forms.example/report?u=https:%2F%2Fsocialrunclubs.de%2Fberlin%2Frun-fun%2F\""));
    assert!(html.contains("<a href=\"/tag/night/\">night</a>"));
    assert!(html.contains("id=\"club-map\" data-lat=\"52.516300\""));
    assert!(html.contains("<script defer src=\"/static/umami-66778899.js\"></script>"));
    assert!(html.contains("<script src=\"/static/script-22334455.js\"></script>"));
    assert!(html.contains("Stand: 2024-06-01 12:00:00"));

    let index = read(out, "index.html");
    assert!(index.contains("href=\"https://forms.example/report?u=\""));
    assert!(index.contains("Aktuell kennen wir 1 Social Run Clubs in 1 Städten."));

    let berlin = read(out, "berlin/index.html");
    assert!(berlin.contains("<a href=\"/hamburg/\">Hamburg</a>"));
    assert!(!berlin.contains("Kleinstadt"), "hidden cities are not linked");
}

#[test]
fn test_local_links() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path();
    let data = sample_data();
    let site = site(out, LinkTarget::Local(out.to_path_buf()));
    render_site(&data, &site, &BuiltinTemplates::new()).unwrap();

    let index = read(out, "index.html");
    let root = out.display().to_string();
    assert!(index.contains(&format!("href=\"{root}/cities.html\"")));
    assert!(index.contains(&format!("href=\"{root}/berlin/run-fun/index.html\"")));
}

#[test]
fn test_template_requires_entity() {
    let tmp = tempfile::tempdir().unwrap();
    let data = sample_data();
    let site = site(tmp.path(), LinkTarget::Remote);
    let tdata = TemplateData::new(&site, &data, "x", "y", "/berlin");
    let err = BuiltinTemplates::new()
        .render(Template::City, &tdata)
        .unwrap_err();
    assert!(matches!(err, RenderError::Template { template: "city.html", .. }));
}
