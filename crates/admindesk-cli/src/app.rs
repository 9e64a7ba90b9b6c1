//! Application wiring and command handlers.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use admindesk_core::config::Config;
use admindesk_core::models::{ArticlePayload, NewRole, RegisterPayload, RelatedEntity, TagPayload};
use admindesk_core::notify::{Notice, Notifier};
use admindesk_core::stores::{
    fetch_advisors, ArticleStore, AuthStore, RoleStore, TagStore, TeamStore,
};
use admindesk_core::utils::{generate_slug, slugify};
use admindesk_core::{ApiClient, Router, SessionController, TokenStore};

use crate::output;
use crate::{Command, TagCommand};

/// Prints notices raised by the API layer to stderr.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        if notice.title.is_empty() {
            eprintln!("[error] {}", notice.description);
        } else {
            eprintln!("[error] {}: {}", notice.title, notice.description);
        }
    }
}

pub struct App {
    config: Config,
    client: ApiClient,
    router: Arc<Router>,
    json: bool,
}

impl App {
    pub fn new(base_url: Option<&str>, json: bool) -> Result<Self> {
        let config = Config::load()?;
        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => config.base_url()?,
        };

        let tokens = Arc::new(TokenStore::new(config.token_storage()?));
        let router = Arc::new(Router::new());
        let session = SessionController::new(tokens, router.clone());
        let client = ApiClient::new(&base_url, session)?.with_notifier(Arc::new(TerminalNotifier));
        debug!(base_url = %client.base_url(), storage = ?config.storage, "Client ready");

        Ok(Self {
            config,
            client,
            router,
            json,
        })
    }

    pub fn current_route(&self) -> String {
        self.router.current()
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email } => self.login_interactive(email).await,
            Command::Logout => {
                self.client.logout().await?;
                println!("Logged out.");
                Ok(())
            }
            Command::Register { email, role } => self.register(email, role).await,
            Command::Status => {
                self.print_status();
                Ok(())
            }
            Command::Tags(tag_command) => self.tags(tag_command).await,
            Command::Articles { tags, page, limit } => self.articles(&tags, page, limit).await,
            Command::Article { slug } => self.article(&slug).await,
            Command::ArticleCreate { file } => {
                let mut payload = read_payload(&file)?;
                let store = ArticleStore::new(self.client.clone());
                if payload.slug.is_empty() {
                    payload.slug = store.generate_slug(&payload.title);
                }
                let created = store.create_article(&payload).await?;
                println!("Created article {} ({})", created.title, created.slug);
                Ok(())
            }
            Command::ArticleUpdate { slug, file } => {
                let payload = read_payload(&file)?;
                let store = ArticleStore::new(self.client.clone());
                let updated = store.update_article(&slug, &payload).await?;
                println!("Updated article {} ({})", updated.title, updated.slug);
                Ok(())
            }
            Command::ArticleDelete { slug } => {
                let mut store = ArticleStore::new(self.client.clone());
                store.delete_article(&slug).await?;
                println!("Deleted article {}", slug);
                Ok(())
            }
            Command::Link {
                article_id,
                kind,
                data,
            } => {
                let entity = parse_entity(&kind)?;
                let body: serde_json::Value =
                    serde_json::from_str(&data).context("Entity data must be JSON")?;
                let store = ArticleStore::new(self.client.clone());
                let linked = store.manage_related_entity(&article_id, entity, &body).await?;
                output::print_json(&linked)
            }
            Command::Unlink { article_id, kind } => {
                let entity = parse_entity(&kind)?;
                let store = ArticleStore::new(self.client.clone());
                store.unlink_related_entity(&article_id, entity).await?;
                println!("Unlinked {} from article {}", entity.as_str(), article_id);
                Ok(())
            }
            Command::Users => {
                let mut store = TeamStore::new(self.client.clone());
                store.fetch_team_members().await;
                if let Some(error) = store.error() {
                    return Err(anyhow!("{}", error));
                }
                self.show(store.members(), output::print_members)
            }
            Command::Roles => {
                let mut store = RoleStore::new(self.client.clone());
                let roles = store.fetch_roles().await?;
                self.show(roles, output::print_roles)
            }
            Command::RoleCreate { name, permissions } => {
                let mut store = RoleStore::new(self.client.clone());
                let role = NewRole {
                    name,
                    permissions: (!permissions.is_empty()).then_some(permissions),
                };
                let created = store.create_role(&role).await?;
                println!("Created role {} (id {})", created.name, created.id);
                Ok(())
            }
            Command::Advisors => {
                let envelope = fetch_advisors(&self.client).await;
                if self.json {
                    return output::print_json(&envelope);
                }
                if !envelope.is_success() {
                    return Err(anyhow!(
                        "{}",
                        envelope.message.unwrap_or_else(|| "Request failed".to_string())
                    ));
                }
                output::print_advisors(envelope.data.as_deref().unwrap_or_default());
                Ok(())
            }
            Command::Slug { title, plain } => {
                println!("{}", slug_for(&title, plain));
                Ok(())
            }
            Command::Overview => self.overview().await,
            Command::Visit { path } => {
                let landed = self.router.visit(&path, &self.client).await?;
                println!("{}", landed);
                Ok(())
            }
        }
    }

    fn show<T: serde::Serialize>(&self, rows: &[T], table: fn(&[T])) -> Result<()> {
        if self.json {
            output::print_json(&rows)
        } else {
            table(rows);
            Ok(())
        }
    }

    /// Prompt for credentials, log in, and remember the email.
    pub async fn login_interactive(&mut self, email: Option<String>) -> Result<()> {
        println!("\n=== admindesk Login ===\n");

        let email = match email {
            Some(email) => email,
            None => Self::prompt_email(self.config.last_email.as_deref())?,
        };
        if email.is_empty() {
            return Err(anyhow!("Email is required"));
        }
        let password = rpassword::prompt_password("Password: ")?;

        println!("\nAuthenticating...");
        AuthStore::new(self.client.clone())
            .login(&email, &password)
            .await?;

        self.config.last_email = Some(email);
        self.config.save()?;
        self.router.push(admindesk_core::routes::HOME_ROUTE);

        println!("Login successful!\n");
        Ok(())
    }

    fn prompt_email(last_email: Option<&str>) -> Result<String> {
        match last_email {
            Some(last) => print!("Email [{}]: ", last),
            None => print!("Email: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        Ok(match (input.is_empty(), last_email) {
            (true, Some(last)) => last.to_string(),
            _ => input.to_string(),
        })
    }

    async fn register(&self, email: String, role: String) -> Result<()> {
        let password = rpassword::prompt_password("Password for new user: ")?;
        let payload = RegisterPayload {
            email,
            password,
            role,
        };
        let envelope = AuthStore::new(self.client.clone()).register(&payload).await?;
        println!(
            "{}",
            envelope
                .message
                .unwrap_or_else(|| format!("Registered {}", payload.email))
        );
        Ok(())
    }

    fn print_status(&self) {
        let session = self.client.tokens().session();
        println!("API:     {}", self.client.base_url());
        println!("Storage: {:?}", self.config.storage);
        println!(
            "Access:  {}",
            if session.access_token.is_some() { "present" } else { "missing" }
        );
        println!(
            "Refresh: {}",
            if session.refresh_token.is_some() { "present" } else { "missing" }
        );
        if let Some(ref email) = self.config.last_email {
            println!("Email:   {}", email);
        }
    }

    async fn tags(&self, command: TagCommand) -> Result<()> {
        let mut store = TagStore::new(self.client.clone());
        match command {
            TagCommand::List => {
                store.fetch_tags().await;
                if let Some(error) = store.error() {
                    return Err(anyhow!("{}", error));
                }
                self.show(store.tags(), output::print_tags)
            }
            TagCommand::Create { name, parent } => {
                let created = store
                    .create_tag(&TagPayload {
                        name: Some(name),
                        parent_id: parent,
                    })
                    .await?;
                println!("Created tag {} ({})", created.name, created.id);
                Ok(())
            }
            TagCommand::Update { id, name, parent } => {
                let updated = store
                    .update_tag(&id, &TagPayload {
                        name,
                        parent_id: parent,
                    })
                    .await?;
                println!("Updated tag {} ({})", updated.name, updated.id);
                Ok(())
            }
            TagCommand::Delete { id } => {
                store.delete_tag(&id).await?;
                println!("Deleted tag {}", id);
                Ok(())
            }
        }
    }

    async fn articles(&self, tags: &[String], page: u32, limit: u32) -> Result<()> {
        let mut store = ArticleStore::new(self.client.clone());
        store.fetch_articles(tags, page, limit).await;
        if let Some(error) = store.error() {
            return Err(anyhow!("{}", error));
        }
        if self.json {
            return output::print_json(&store.articles());
        }
        output::print_articles(store.articles());
        println!(
            "\nPage {} of {}",
            store.current_page(),
            store.total_pages().max(1)
        );
        Ok(())
    }

    async fn article(&self, slug: &str) -> Result<()> {
        let mut store = ArticleStore::new(self.client.clone());
        let article = store
            .get_article_by_slug(slug)
            .await
            .ok_or_else(|| anyhow!("{}", store.error().unwrap_or("Article not found")))?;
        if self.json {
            return output::print_json(&article);
        }
        output::print_article(&article);
        Ok(())
    }

    /// Load the three listings concurrently. A refresh triggered by one of
    /// them is shared with the others.
    async fn overview(&self) -> Result<()> {
        let mut tags = TagStore::new(self.client.clone());
        let mut team = TeamStore::new(self.client.clone());
        let mut roles = RoleStore::new(self.client.clone());

        let (tag_count, member_count, role_result) = futures::join!(
            async { tags.fetch_tags().await.len() },
            async { team.fetch_team_members().await.len() },
            async { roles.fetch_roles().await.map(|r| r.len()) },
        );
        info!(tag_count, member_count, "Overview loaded");

        println!("Tags:    {}", report(tag_count, tags.error()));
        println!("Users:   {}", report(member_count, team.error()));
        match role_result {
            Ok(count) => println!("Roles:   {}", count),
            Err(e) => println!("Roles:   {}", e),
        }
        Ok(())
    }
}

fn report(count: usize, error: Option<&str>) -> String {
    match error {
        Some(error) => error.to_string(),
        None => count.to_string(),
    }
}

fn slug_for(title: &str, plain: bool) -> String {
    if plain {
        slugify(title)
    } else {
        generate_slug(title)
    }
}

fn parse_entity(kind: &str) -> Result<RelatedEntity> {
    RelatedEntity::from_str(kind)
        .ok_or_else(|| anyhow!("Unknown entity '{}', expected advisor, school or visaType", kind))
}

fn read_payload(path: &Path) -> Result<ArticlePayload> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid article payload in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_for_appends_suffix_unless_plain() {
        assert_eq!(slug_for("Café Déjà Vu!", true), "cafe-deja-vu");

        let slug = slug_for("Café Déjà Vu!", false);
        let suffix = slug.strip_prefix("cafe-deja-vu-").unwrap();
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_parse_entity_kinds() {
        assert_eq!(parse_entity("visaType").unwrap(), RelatedEntity::VisaType);
        assert!(parse_entity("mentor").is_err());
    }
}
