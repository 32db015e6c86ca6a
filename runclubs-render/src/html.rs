//! The built-in HTML templates.
//!
//! Markup is assembled by hand. Text from the sheets is escaped; club and
//! tag descriptions are trusted HTML and inserted as is.

use std::borrow::Cow;

use quick_xml::escape::escape;
use runclubs_core::{City, CityId, Club, ClubId, LatLon};

use crate::error::RenderError;
use crate::template::{Template, TemplateData, TemplateEngine};

fn esc(s: &str) -> Cow<'_, str> {
    escape(s)
}

fn coord_attrs(coords: Option<LatLon>) -> String {
    match coords {
        Some(ll) => format!(" data-lat=\"{:.6}\" data-lon=\"{:.6}\"", ll.lat, ll.lon),
        None => String::new(),
    }
}

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for BuiltinTemplates {
    fn render(&self, template: Template, t: &TemplateData<'_>) -> Result<String, RenderError> {
        let mut body = String::new();
        match template {
            Template::Index => index(&mut body, t),
            Template::Impressum => impressum(&mut body, t),
            Template::Datenschutz => datenschutz(&mut body, t),
            Template::Cities => cities(&mut body, t),
            Template::CitiesNoClub => cities_no_club(&mut body, t),
            Template::Clubs => clubs(&mut body, t),
            Template::Tags => tags(&mut body, t),
            Template::City => {
                let city = t
                    .city
                    .ok_or_else(|| RenderError::template(template.name(), "no city given"))?;
                city_page(&mut body, t, city);
            }
            Template::Club => {
                let club = t
                    .club
                    .ok_or_else(|| RenderError::template(template.name(), "no club given"))?;
                club_page(&mut body, t, club);
            }
            Template::Tag => {
                let tag = t
                    .tag
                    .ok_or_else(|| RenderError::template(template.name(), "no tag given"))?;
                body.push_str(&format!("<h1>{}</h1>\n", esc(&tag.name)));
                if let Some(desc) = &tag.description {
                    body.push_str(&format!("<div class=\"description\">{desc}</div>\n"));
                }
                club_list(&mut body, t, &tag.clubs);
            }
            Template::NotFound => {
                body.push_str("<h1>404 - Seite nicht gefunden</h1>\n");
                body.push_str(
                    "<p>Die von dir angeforderte Seite konnte nicht gefunden werden.</p>\n",
                );
                body.push_str(&format!(
                    "<p><a href=\"{}\">Zur Startseite</a></p>\n",
                    esc(&t.link("/"))
                ));
            }
        }
        Ok(layout(t, &body))
    }
}

fn layout(t: &TemplateData<'_>, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", esc(&t.title)));
    html.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        esc(&t.description)
    ));
    html.push_str(&format!("<link rel=\"canonical\" href=\"{}\">\n", esc(&t.canonical)));
    for css in &t.site.css_files {
        html.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            esc(&t.link(css))
        ));
    }
    if let Some(umami) = &t.site.umami_js {
        html.push_str(&format!("<script defer src=\"{}\"></script>\n", esc(&t.link(umami))));
    }
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n<nav>\n");
    for (path, label) in [
        ("/", "Social Run Clubs"),
        ("/cities.html", "Städte"),
        ("/clubs.html", "Clubs"),
        ("/tags.html", "Kategorien"),
    ] {
        html.push_str(&format!("<a href=\"{}\">{label}</a>\n", esc(&t.link(path))));
    }
    html.push_str("</nav>\n</header>\n<main>\n");
    html.push_str(body);
    html.push_str("</main>\n<footer>\n");
    if !t.submit_url().is_empty() {
        html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Club eintragen</a>\n",
            esc(t.submit_url())
        ));
    }
    let report = t.report_link();
    if !report.is_empty() {
        html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Fehler melden</a>\n",
            esc(&report)
        ));
    }
    html.push_str(&format!(
        "<a href=\"{}\">Impressum</a>\n<a href=\"{}\">Datenschutz</a>\n",
        esc(&t.link("/impressum.html")),
        esc(&t.link("/datenschutz.html"))
    ));
    if !t.last_update().is_empty() {
        html.push_str(&format!("<p>Stand: {}</p>\n", esc(t.last_update())));
    }
    html.push_str("</footer>\n");
    for js in &t.site.js_files {
        html.push_str(&format!("<script src=\"{}\"></script>\n", esc(&t.link(js))));
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn filter_input(body: &mut String) {
    body.push_str("<input id=\"filter-input\" type=\"search\" placeholder=\"Filter...\">\n");
}

fn city_item(body: &mut String, t: &TemplateData<'_>, city: &City) {
    let count = city.clubs.len();
    body.push_str(&format!(
        "<li data-search=\"{}\" data-url=\"{}\" data-name=\"{}\" data-clubs=\"{count}\"{}>",
        esc(&city.search()),
        esc(&t.link(&city.slug())),
        esc(&city.name),
        coord_attrs(city.coords)
    ));
    body.push_str(&format!(
        "<a href=\"{}\">{}</a>",
        esc(&t.link(&city.slug())),
        esc(&city.name)
    ));
    if count > 0 {
        body.push_str(&format!(" ({count})"));
    }
    body.push_str("</li>\n");
}

fn city_list<'a>(body: &mut String, t: &TemplateData<'_>, cities: impl Iterator<Item = &'a City>) {
    body.push_str("<ul class=\"cities\">\n");
    for city in cities {
        city_item(body, t, city);
    }
    body.push_str("</ul>\n");
}

fn club_list(body: &mut String, t: &TemplateData<'_>, ids: &[ClubId]) {
    body.push_str("<ul class=\"clubs\">\n");
    for club in ids.iter().map(|id| t.data.club(*id)) {
        body.push_str(&format!(
            "<li data-search=\"{}\" data-url=\"{}\" data-name=\"{}\"{}>",
            esc(&club.search()),
            esc(&t.link(&club.slug())),
            esc(&club.name),
            coord_attrs(club.coords)
        ));
        body.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            esc(&t.link(&club.slug())),
            esc(&club.name)
        ));
        if let Some(city) = t.data.club_city(club) {
            body.push_str(&format!(
                " in <a href=\"{}\">{}</a>",
                esc(&t.link(&city.slug())),
                esc(&city.name)
            ));
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ul>\n");
}

fn index(body: &mut String, t: &TemplateData<'_>) {
    let data = t.data;
    let with_clubs = data.cities().filter(|c| c.has_clubs()).count();
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    body.push_str(&format!(
        "<p>Aktuell kennen wir {} Social Run Clubs in {with_clubs} Städten.</p>\n",
        data.number_clubs
    ));
    if !data.latest_clubs.is_empty() {
        body.push_str("<h2>Neu hinzugefügt</h2>\n");
        club_list(body, t, &data.latest_clubs);
    }
    if !data.top_cities.is_empty() {
        body.push_str("<h2>Städte mit den meisten Clubs</h2>\n");
        city_list(body, t, data.top_cities.iter().map(|id| data.city(*id)));
    }
}

fn impressum(body: &mut String, t: &TemplateData<'_>) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    body.push_str("<p>Angaben gemäß § 5 DDG.</p>\n");
}

fn datenschutz(body: &mut String, t: &TemplateData<'_>) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    body.push_str(
        "<p>Diese Website speichert keine personenbezogenen Daten. \
         Die Reichweitenmessung erfolgt anonym und ohne Cookies.</p>\n",
    );
}

fn cities(body: &mut String, t: &TemplateData<'_>) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    filter_input(body);
    body.push_str("<div id=\"city-map\"></div>\n");
    city_list(body, t, t.data.cities().filter(|c| c.has_clubs()));
}

fn cities_no_club(body: &mut String, t: &TemplateData<'_>) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    filter_input(body);
    city_list(body, t, t.data.cities().filter(|c| !c.has_clubs() && c.show()));
}

fn clubs(body: &mut String, t: &TemplateData<'_>) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    filter_input(body);
    body.push_str("<div id=\"clubs-map\"></div>\n");
    club_list(body, t, &t.data.sorted_clubs);
}

fn tags(body: &mut String, t: &TemplateData<'_>) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&t.title)));
    body.push_str("<ul class=\"tags\">\n");
    for tag in t.data.tags() {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a> ({})</li>\n",
            esc(&t.link(&tag.slug())),
            esc(&tag.name),
            tag.clubs.len()
        ));
    }
    body.push_str("</ul>\n");
}

fn nearest(body: &mut String, t: &TemplateData<'_>, heading: &str, ids: Option<&Vec<CityId>>) {
    let Some(ids) = ids else {
        return;
    };
    let cities: Vec<&City> = ids
        .iter()
        .map(|id| t.data.city(*id))
        .filter(|c| c.show())
        .collect();
    if cities.is_empty() {
        return;
    }
    body.push_str(&format!("<h2>{heading}</h2>\n"));
    city_list(body, t, cities.into_iter());
}

fn city_page(body: &mut String, t: &TemplateData<'_>, city: &City) {
    body.push_str(&format!("<h1>Social Run Clubs in {}</h1>\n", esc(&city.name)));
    if city.has_clubs() {
        body.push_str("<div id=\"clubs-map\"></div>\n");
        club_list(body, t, &city.clubs);
    } else {
        body.push_str(&format!(
            "<p>Aktuell gibt es leider keine Einträge für {}.</p>\n",
            esc(&city.name)
        ));
    }
    nearest(
        body,
        t,
        "Städte in der Nähe mit Social Run Clubs",
        city.nearest_cities.as_ref(),
    );
    nearest(
        body,
        t,
        "Städte in der Nähe ohne Social Run Clubs",
        city.nearest_cities_no_club.as_ref(),
    );
}

fn club_page(body: &mut String, t: &TemplateData<'_>, club: &Club) {
    body.push_str(&format!("<h1>{}</h1>\n", esc(&club.name)));
    if let Some(city) = t.data.club_city(club) {
        body.push_str(&format!(
            "<p>Social Run Club in <a href=\"{}\">{}</a></p>\n",
            esc(&t.link(&city.slug())),
            esc(&city.name)
        ));
    }
    if !club.description.is_empty() {
        body.push_str(&format!("<div class=\"description\">{}</div>\n", club.description));
    }

    if !club.tags.is_empty() {
        body.push_str("<p class=\"tags\">\n");
        for tag in club.tags.iter().map(|id| t.data.tag(*id)) {
            body.push_str(&format!(
                "<a href=\"{}\">{}</a>\n",
                esc(&t.link(&tag.slug())),
                esc(&tag.name)
            ));
        }
        body.push_str("</p>\n");
    }

    let links = [
        (&club.instagram, "Instagram"),
        (&club.strava, "Strava"),
        (&club.website, "Website"),
    ];
    if links.iter().any(|(url, _)| !url.is_empty()) {
        body.push_str("<ul class=\"links\">\n");
        for (url, label) in links.iter().filter(|(url, _)| !url.is_empty()) {
            body.push_str(&format!(
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{label}</a></li>\n",
                esc(url)
            ));
        }
        body.push_str("</ul>\n");
    }

    if let Some(ll) = club.coords {
        body.push_str(&format!(
            "<div id=\"club-map\" data-lat=\"{:.6}\" data-lon=\"{:.6}\" data-name=\"{}\"></div>\n",
            ll.lat,
            ll.lon,
            esc(&club.name)
        ));
    }
    if !club.added.is_empty() {
        body.push_str(&format!("<p>Hinzugefügt: {}</p>\n", esc(&club.added)));
    }
    if !club.updated.is_empty() {
        body.push_str(&format!("<p>Aktualisiert: {}</p>\n", esc(&club.updated)));
    }
    body.push_str(&format!(
        "<button data-share data-url=\"{}\" data-title=\"{}\">Teilen</button>\n",
        esc(&t.canonical),
        esc(&t.title)
    ));
}
