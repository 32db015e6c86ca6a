//! Per-page template data and the engine seam.

use runclubs_core::{City, Club, Data, Tag};

use crate::error::RenderError;
use crate::links::path_escape;
use crate::site::SiteContext;

/// Every template the site is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Index,
    Impressum,
    Datenschutz,
    Cities,
    CitiesNoClub,
    Clubs,
    Tags,
    City,
    Club,
    Tag,
    NotFound,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::Impressum => "impressum.html",
            Self::Datenschutz => "datenschutz.html",
            Self::Cities => "cities.html",
            Self::CitiesNoClub => "cities-no-club.html",
            Self::Clubs => "clubs.html",
            Self::Tags => "tags.html",
            Self::City => "city.html",
            Self::Club => "club.html",
            Self::Tag => "tag.html",
            Self::NotFound => "404.html",
        }
    }
}

/// A top-level page with fixed metadata.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub title: &'static str,
    pub description: &'static str,
    pub canonical: &'static str,
    pub template: Template,
    pub out_file: &'static str,
}

pub const PAGES: &[Page] = &[
    Page {
        title: "Social Run Clubs in Deutschland",
        description: "Eine Übersicht über alle Social Run Clubs in Deutschland.",
        canonical: "/",
        template: Template::Index,
        out_file: "index.html",
    },
    Page {
        title: "Impressum - Social Run Clubs",
        description: "Impressum von socialrunclubs.de.",
        canonical: "/impressum.html",
        template: Template::Impressum,
        out_file: "impressum.html",
    },
    Page {
        title: "Datenschutz - Social Run Clubs",
        description: "Datenschutz von socialrunclubs.de.",
        canonical: "/datenschutz.html",
        template: Template::Datenschutz,
        out_file: "datenschutz.html",
    },
    Page {
        title: "Deutsche Städte mit Social Run Clubs",
        description: "Eine Übersicht über alle Städte mit Social Run Clubs.",
        canonical: "/cities.html",
        template: Template::Cities,
        out_file: "cities.html",
    },
    Page {
        title: "Deutsche Städte ohne Social Run Clubs",
        description: "Eine Übersicht über alle Städte ohne Social Run Clubs.",
        canonical: "/cities-no-club.html",
        template: Template::CitiesNoClub,
        out_file: "cities-no-club.html",
    },
    Page {
        title: "Alphabetische Liste deutscher Social Run Clubs",
        description: "Eine Übersicht über alle Social Run Clubs in Deutschland.",
        canonical: "/clubs.html",
        template: Template::Clubs,
        out_file: "clubs.html",
    },
    Page {
        title: "Social Run Club Kategorien",
        description: "Eine Übersicht über alle Social Run Club Kategorien.",
        canonical: "/tags.html",
        template: Template::Tags,
        out_file: "tags.html",
    },
];

/// Everything a template sees when rendering one page.
#[derive(Debug, Clone)]
pub struct TemplateData<'a> {
    pub site: &'a SiteContext,
    pub data: &'a Data,
    pub title: String,
    pub description: String,
    /// Absolute URL of this page.
    pub canonical: String,
    pub city: Option<&'a City>,
    pub club: Option<&'a Club>,
    pub tag: Option<&'a Tag>,
}

impl<'a> TemplateData<'a> {
    pub fn new(
        site: &'a SiteContext,
        data: &'a Data,
        title: impl Into<String>,
        description: impl Into<String>,
        path: &str,
    ) -> Self {
        Self {
            site,
            data,
            title: title.into(),
            description: description.into(),
            canonical: site.canonical(path),
            city: None,
            club: None,
            tag: None,
        }
    }

    pub fn with_city(mut self, city: &'a City) -> Self {
        self.city = Some(city);
        self
    }

    pub fn with_club(mut self, club: &'a Club) -> Self {
        self.club = Some(club);
        self
    }

    pub fn with_tag(mut self, tag: &'a Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn last_update(&self) -> &str {
        &self.data.last_update
    }

    pub fn submit_url(&self) -> &str {
        &self.site.submit_url
    }

    /// The report form URL. On club pages the `NAME` placeholder carries
    /// the page URL, elsewhere it is dropped.
    pub fn report_link(&self) -> String {
        let report_url = &self.site.report_url;
        match self.club {
            Some(_) => report_url.replace("NAME", &path_escape(&self.canonical)),
            None => report_url.replace("NAME", ""),
        }
    }

    /// Resolve a site path for the current link target.
    pub fn link(&self, path: &str) -> String {
        self.site.target.link(path)
    }
}

/// Turns template data into a finished document.
pub trait TemplateEngine {
    fn render(&self, template: Template, data: &TemplateData<'_>) -> Result<String, RenderError>;
}
