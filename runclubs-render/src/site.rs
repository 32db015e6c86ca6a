//! The render pass over the finished data model.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::escape::escape;
use runclubs_core::{Config, Data};

use crate::assets::Assets;
use crate::error::RenderError;
use crate::links::{LinkTarget, canonical};
use crate::template::{PAGES, Template, TemplateData, TemplateEngine};

/// Settings shared by every page of one build.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub output_dir: PathBuf,
    pub base_url: String,
    pub target: LinkTarget,
    pub submit_url: String,
    pub report_url: String,
    pub css_files: Vec<String>,
    pub js_files: Vec<String>,
    pub umami_js: Option<String>,
    /// IndexNow key; empty when disabled.
    pub index_now: String,
}

impl SiteContext {
    pub fn new(config: &Config, assets: &Assets) -> Self {
        let target = if config.is_remote_target {
            LinkTarget::Remote
        } else {
            LinkTarget::Local(config.output_dir.clone())
        };
        let (umami_js, js_files) = assets.split_analytics();
        Self {
            output_dir: config.output_dir.clone(),
            base_url: config.base_url.clone(),
            target,
            submit_url: config.google.submit_url.clone(),
            report_url: config.google.report_url.clone(),
            css_files: assets.css.clone(),
            js_files,
            umami_js,
            index_now: config.ahrefs.index_now.clone(),
        }
    }

    pub fn canonical(&self, path: &str) -> String {
        canonical(&self.base_url, path)
    }

    /// Output file for a site path: directories get an `index.html`.
    fn out_file(&self, path: &str) -> PathBuf {
        let rel = path.trim_matches('/');
        if rel.contains('.') {
            self.output_dir.join(rel)
        } else {
            self.output_dir.join(rel).join("index.html")
        }
    }
}

/// What a render pass produced.
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub pages: usize,
    /// Canonical URLs in render order, as listed in `sitemap.xml`.
    pub sitemap_urls: Vec<String>,
}

fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| RenderError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

struct Pass<'a, E: ?Sized> {
    engine: &'a E,
    summary: RenderSummary,
}

impl<E: TemplateEngine + ?Sized> Pass<'_, E> {
    fn page(
        &mut self,
        template: Template,
        out: &Path,
        data: &TemplateData<'_>,
        in_sitemap: bool,
    ) -> Result<(), RenderError> {
        let html = self.engine.render(template, data)?;
        write_file(out, &html)?;
        self.summary.pages += 1;
        if in_sitemap {
            self.summary.sitemap_urls.push(data.canonical.clone());
        }
        Ok(())
    }
}

/// Render every page plus `.htaccess`, `sitemap.xml` and the IndexNow key
/// file into the output directory.
///
/// Order: the fixed pages, each city with clubs followed by its club pages,
/// the visible clubless cities, the tag pages, and finally `404.html`.
pub fn render_site<E: TemplateEngine + ?Sized>(
    data: &Data,
    site: &SiteContext,
    engine: &E,
) -> Result<RenderSummary, RenderError> {
    fs::create_dir_all(&site.output_dir)?;

    if !site.index_now.is_empty() {
        let key_file = site.output_dir.join(format!("{}.txt", site.index_now));
        write_file(&key_file, &site.index_now)?;
    }

    let mut pass = Pass {
        engine,
        summary: RenderSummary::default(),
    };

    for page in PAGES {
        let tdata = TemplateData::new(site, data, page.title, page.description, page.canonical);
        let out = site.output_dir.join(page.out_file);
        pass.page(page.template, &out, &tdata, true)
            .map_err(|e| RenderError::page(format!("template {}", page.template.name()), e))?;
    }

    for city in data.cities().filter(|c| c.has_clubs()) {
        let slug = city.slug();
        let tdata = TemplateData::new(
            site,
            data,
            format!("Social Run Clubs in {}", city.name),
            city.meta_description(data),
            &slug,
        )
        .with_city(city);
        pass.page(Template::City, &site.out_file(&slug), &tdata, true)
            .map_err(|e| RenderError::page(format!("city template {:?}", city.name), e))?;

        for club in city.clubs.iter().map(|id| data.club(*id)) {
            let slug = club.slug();
            let tdata = TemplateData::new(
                site,
                data,
                format!("{} - ein Social Run Club in {}", club.name, city.name),
                club.meta_description(),
                &slug,
            )
            .with_city(city)
            .with_club(club);
            pass.page(Template::Club, &site.out_file(&slug), &tdata, true)
                .map_err(|e| RenderError::page(format!("club template {:?}", club.name), e))?;
        }
    }

    for city in data.cities().filter(|c| !c.has_clubs()) {
        if !city.show() {
            log::debug!("skipping page for small city {:?}", city.name);
            continue;
        }
        let slug = city.slug();
        let tdata = TemplateData::new(
            site,
            data,
            format!("Social Run Clubs in {}", city.name),
            city.meta_description(data),
            &slug,
        )
        .with_city(city);
        pass.page(Template::City, &site.out_file(&slug), &tdata, true)
            .map_err(|e| RenderError::page(format!("city template {:?}", city.name), e))?;
    }

    for tag in data.tags() {
        let slug = tag.slug();
        let tdata = TemplateData::new(
            site,
            data,
            format!("Social Run Clubs in der Kategorie {}", tag.name),
            format!(
                "Eine Übersicht über alle Social Run Clubs in der Kategorie {}.",
                tag.name
            ),
            &slug,
        )
        .with_tag(tag);
        pass.page(Template::Tag, &site.out_file(&slug), &tdata, true)
            .map_err(|e| RenderError::page(format!("tag template {:?}", tag.name), e))?;
    }

    let tdata = TemplateData::new(
        site,
        data,
        "404 - Seite nicht gefunden",
        "Die von dir angeforderte Seite konnte nicht gefunden werden.",
        "/404.html",
    );
    pass.page(Template::NotFound, &site.output_dir.join("404.html"), &tdata, false)
        .map_err(|e| RenderError::page("404 template", e))?;

    write_file(&site.output_dir.join(".htaccess"), &htaccess(&data.redirects))?;
    let summary = pass.summary;
    write_file(&site.output_dir.join("sitemap.xml"), &sitemap(&summary.sitemap_urls))?;

    log::info!(
        "rendered {} pages, {} redirects into {}",
        summary.pages,
        data.redirects.len(),
        site.output_dir.display()
    );
    Ok(summary)
}

/// Apache config: the 404 document and one permanent redirect per entry.
pub fn htaccess(redirects: &BTreeMap<String, String>) -> String {
    let mut out = String::from("ErrorDocument 404 /404.html\n\n");
    for (from, to) in redirects {
        out.push_str(&format!("Redirect 301 {from} {to}\n"));
    }
    out
}

pub fn sitemap(urls: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<urlset xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://www.sitemaps.org/schemas/sitemap/0.9 \
         http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd\" \
         xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str("    <loc>");
        xml.push_str(&escape(url.as_str()));
        xml.push_str("</loc>\n");
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
#[path = "tests/site_tests.rs"]
mod tests;
