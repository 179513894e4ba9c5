//! Authenticated portal client
//!
//! Sequences the handshake, the JSON listings and the scraped tool pages.
//! Every operation checks the session first and fails without touching the
//! network once the session is gone.

use crate::auth::{self, Credentials, SessionContext};
use crate::config::Config;
use crate::fetch::{build_http_client, Document};
use crate::models::{Announcement, AnnouncementListing, Site, SiteListing, User};
use crate::scrape::{scraper_for, Assignment, GradeReport, HtmlScraper, Tool};
use crate::{Result, TsquareError};
use url::Url;

/// Title of the iframe holding the assignments tool
pub const ASSIGNMENTS_IFRAME_TITLE: &str = "Assignments ";

/// Title of the iframe holding the gradebook
pub const GRADEBOOK_IFRAME_TITLE: &str = "Gradebook ";

/// Title of the iframe holding the syllabus
pub const SYLLABUS_IFRAME_TITLE: &str = "Syllabus ";

/// A logged-in portal client
pub struct TsquareClient {
    config: Config,
    username: String,
    session: SessionContext,
    scraper: Box<dyn HtmlScraper>,
}

impl TsquareClient {
    /// Logs in and redeems a portal session
    ///
    /// The extraction backend is chosen by `config.scraper.backend`.
    pub async fn login(config: Config, credentials: Credentials) -> Result<Self> {
        let client = build_http_client(&config.http).map_err(|source| TsquareError::Http {
            url: config.sso.base_url.clone(),
            source,
        })?;

        let username = credentials.username().to_string();
        let (tgt, st) = auth::authenticate(&client, &config.sso, credentials).await?;
        let session = auth::redeem(client, &config.sso, tgt, &st).await?;
        let scraper = scraper_for(&config.scraper.backend);

        tracing::info!(
            "Logged in as {} (scraper backend: {})",
            username,
            scraper.name()
        );

        Ok(Self {
            config,
            username,
            session,
            scraper,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn scraper(&self) -> &dyn HtmlScraper {
        self.scraper.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Revokes the login; the client is unusable afterwards
    pub async fn logout(&self) -> Result<()> {
        self.session.ensure_authenticated("logout")?;
        let age = self.session.age();
        self.session.invalidate().await;
        tracing::info!(
            "Logged out {} (session age {}s)",
            self.username,
            age.num_seconds()
        );
        Ok(())
    }

    /// The logged-in user's profile
    pub async fn user_info(&self) -> Result<User> {
        self.session.ensure_authenticated("user_info")?;
        let mut user: User = self
            .session
            .fetcher()
            .get_json(&self.direct_url("user/current.json"))
            .await?;
        user.extra.remove("password");
        Ok(user)
    }

    pub async fn site_by_id(&self, id: &str) -> Result<Site> {
        self.session.ensure_authenticated("site_by_id")?;
        self.session
            .fetcher()
            .get_json(&self.direct_url(&format!("site/{}.json", id)))
            .await
    }

    /// All sites visible to the user
    ///
    /// An empty or absent `site_collection` means the portal dropped the
    /// session: the client is marked unauthenticated and `SessionExpired`
    /// is returned.
    pub async fn sites(&self) -> Result<Vec<Site>> {
        self.sites_filtered(|_| true).await
    }

    /// Sites for which `filter` returns true
    pub async fn sites_filtered<F>(&self, filter: F) -> Result<Vec<Site>>
    where
        F: Fn(&Site) -> bool,
    {
        self.session.ensure_authenticated("sites")?;
        let listing: SiteListing = self
            .session
            .fetcher()
            .get_json(&self.direct_url("site.json"))
            .await?;

        match listing.site_collection {
            Some(sites) if !sites.is_empty() => Ok(sites.into_iter().filter(|s| filter(s)).collect()),
            _ => Err(self.session.expire()),
        }
    }

    /// Recent announcements, from one site or from all of them
    ///
    /// At most `num` announcements no older than `age` days.
    pub async fn announcements(
        &self,
        site: Option<&Site>,
        num: u32,
        age: u32,
    ) -> Result<Vec<Announcement>> {
        self.session.ensure_authenticated("announcements")?;
        let path = match site {
            Some(site) => format!("announcement/site/{}.json?n={}&d={}", site.id, num, age),
            None => format!("announcement/user.json?n={}&d={}", num, age),
        };
        let listing: AnnouncementListing = self
            .session
            .fetcher()
            .get_json(&self.direct_url(&path))
            .await?;
        Ok(listing.announcement_collection)
    }

    /// Tools linked from the site's portal page
    pub async fn tools(&self, site: &Site) -> Result<Vec<Tool>> {
        self.session.ensure_authenticated("tools")?;
        let document = self.session.fetcher().get_ok(&site.portal_url()).await?;
        Ok(self.scraper.get_tools(&document.body)?)
    }

    /// Assignments of a site; empty if the site has no assignments tool
    pub async fn assignments(&self, site: &Site) -> Result<Vec<Assignment>> {
        self.session.ensure_authenticated("assignments")?;
        match self
            .tool_frame(site, "assignments", ASSIGNMENTS_IFRAME_TITLE)
            .await?
        {
            Some(frame) => Ok(self.scraper.get_assignments(&frame.body)?),
            None => Ok(Vec::new()),
        }
    }

    /// Gradebook of a site; `None` if the site has no gradebook
    pub async fn grades(&self, site: &Site) -> Result<Option<GradeReport>> {
        self.session.ensure_authenticated("grades")?;
        match self
            .tool_frame(site, "gradebook-tool", GRADEBOOK_IFRAME_TITLE)
            .await?
        {
            Some(frame) => Ok(Some(self.scraper.get_grades(&frame.body)?)),
            None => Ok(None),
        }
    }

    /// Syllabus markup of a site; `None` if the site has no syllabus
    ///
    /// The portal does not restrict what the syllabus contains, so the
    /// result may or may not be HTML.
    pub async fn syllabus(&self, site: &Site) -> Result<Option<String>> {
        self.session.ensure_authenticated("syllabus")?;
        match self
            .tool_frame(site, "syllabus", SYLLABUS_IFRAME_TITLE)
            .await?
        {
            Some(frame) => Ok(Some(self.scraper.get_syllabus(&frame.body)?)),
            None => Ok(None),
        }
    }

    /// Fetches the document inside a tool's iframe
    ///
    /// Returns `None` when the site lacks the tool or the tool page lacks
    /// the iframe. Iframe titles are compared trimmed.
    async fn tool_frame(
        &self,
        site: &Site,
        tool_name: &str,
        iframe_title: &str,
    ) -> Result<Option<Document>> {
        let tools = self.tools(site).await?;
        let Some(tool) = tools.iter().find(|tool| tool.name == tool_name) else {
            tracing::warn!("Site {} has no {} tool", site.id, tool_name);
            return Ok(None);
        };

        let fetcher = self.session.fetcher();
        let tool_page = fetcher
            .get_ok(&resolve(&site.portal_url(), &tool.href)?)
            .await?;
        let iframes = self.scraper.get_iframes(&tool_page.body)?;

        let wanted = iframe_title.trim();
        // First match wins
        let Some(frame) = iframes.iter().find(|frame| frame.title == wanted) else {
            tracing::warn!(
                "No '{}' iframe found on the {} tool page of site {}",
                wanted,
                tool_name,
                site.id
            );
            return Ok(None);
        };

        Ok(Some(fetcher.get_ok(&resolve(&tool_page.url, &frame.src)?).await?))
    }

    fn direct_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.portal.direct_url.trim_end_matches('/'),
            path
        )
    }
}

/// Resolves a possibly relative link against the page it was found on
fn resolve(base: &str, href: &str) -> Result<String> {
    Ok(Url::parse(base)?.join(href)?.to_string())
}

impl std::fmt::Debug for TsquareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsquareClient")
            .field("username", &self.username)
            .field("authenticated", &self.is_authenticated())
            .field("scraper", &self.scraper.name())
            .finish()
    }
}
