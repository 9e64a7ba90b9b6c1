//! Plain-text tables for command output.

use anyhow::Result;
use serde::Serialize;

use admindesk_core::models::{Advisor, Article, Role, Tag, TeamMember};
use admindesk_core::utils::{format_date, format_optional, truncate_string};

const TITLE_WIDTH: usize = 40;
const NAME_WIDTH: usize = 24;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("No tags.");
        return;
    }
    println!("{:<36}  {:<24}  {:<24}  {}", "ID", "NAME", "PARENT", "CREATED");
    for tag in tags {
        println!(
            "{:<36}  {:<24}  {:<24}  {}",
            tag.id,
            truncate_string(&tag.name, NAME_WIDTH),
            truncate_string(&format_optional(&tag.parent, "-"), NAME_WIDTH),
            format_date(&tag.created_at)
        );
    }
}

pub fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles.");
        return;
    }
    println!("{:<40}  {:<40}  {:<10}  {:>6}", "TITLE", "SLUG", "STATUS", "VIEWS");
    for article in articles {
        println!(
            "{:<40}  {:<40}  {:<10}  {:>6}",
            truncate_string(&article.title, TITLE_WIDTH),
            truncate_string(&article.slug, TITLE_WIDTH),
            format_optional(&article.status, "-"),
            article.view_count
        );
    }
}

pub fn print_article(article: &Article) {
    println!("{}", article.title);
    println!("  slug:     {}", article.slug);
    println!("  status:   {}", format_optional(&article.status, "-"));
    println!(
        "  created:  {}",
        article.created_at.as_deref().map(format_date).unwrap_or_default()
    );
    if let Some(ref tags) = article.tags {
        println!("  tag:      {}", tags.primary);
        if !tags.sub_tags.is_empty() {
            println!("  subtags:  {}", tags.sub_tags.join(", "));
        }
    }
    if let Some(ref advisor) = article.advisor {
        println!("  advisor:  {}", advisor.full_name);
    }
    if let Some(ref school) = article.school {
        println!("  school:   {}", school.name);
    }
    if let Some(ref visa) = article.visa_type {
        println!("  visa:     {}", visa.name);
    }
    if !article.translations.is_empty() {
        let languages: Vec<&str> = article
            .translations
            .iter()
            .map(|t| t.language.as_str())
            .collect();
        println!("  languages: {}", languages.join(", "));
    }
    if let Some(ref description) = article.description {
        println!("\n{}", description);
    }
}

pub fn print_members(members: &[TeamMember]) {
    if members.is_empty() {
        println!("No team members.");
        return;
    }
    println!("{:<24}  {:<20}  {:<32}  {}", "NAME", "TITLE", "EMAIL", "ROLE");
    for member in members {
        println!(
            "{:<24}  {:<20}  {:<32}  {}",
            truncate_string(&member.full_name, NAME_WIDTH),
            truncate_string(&member.title, 20),
            member.email,
            member
                .role_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

pub fn print_roles(roles: &[Role]) {
    for role in roles {
        match role.permissions {
            Some(ref permissions) if !permissions.is_empty() => {
                println!("{:>4}  {}  [{}]", role.id, role.name, permissions.join(", "))
            }
            _ => println!("{:>4}  {}", role.id, role.name),
        }
    }
}

pub fn print_advisors(advisors: &[Advisor]) {
    if advisors.is_empty() {
        println!("No advisors.");
        return;
    }
    for advisor in advisors {
        println!(
            "{:<24}  {:<24}  article {}",
            truncate_string(&advisor.full_name, NAME_WIDTH),
            truncate_string(&advisor.title, NAME_WIDTH),
            advisor.article_id
        );
    }
}
