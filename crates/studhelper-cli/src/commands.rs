//! CLI command implementations.

use anyhow::{bail, Context, Result};
use studhelper_client::{RegisterRequest, UploadFile};
use studhelper_store::{AppContext, Settings};
use studhelper_types::{ClassId, ClassRecord, DocumentRecord};
use studhelper_validation::{
    validate_class_name, validate_email, validate_file_upload, validate_password,
    validate_username, validate_youtube_url, Validation,
};

use crate::{ChatCommands, ClassCommands, Cli, Commands, DocCommands, ValidateKind};

/// Dispatches a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    if let Commands::Validate { kind, value } = &cli.command {
        return validate(*kind, value).await;
    }

    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(url) = cli.api_url {
        settings.api_url = url;
    }
    let ctx = AppContext::new(settings)?;

    match cli.command {
        Commands::Login { email, password } => login(&ctx, &email, &password).await,
        Commands::Register {
            email,
            username,
            password,
            full_name,
        } => {
            let req = RegisterRequest {
                email,
                username,
                password,
                full_name,
            };
            register(&ctx, &req).await
        }
        Commands::Logout => {
            ctx.auth_facade().logout().await;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => whoami(&ctx).await,
        Commands::Classes { command } => {
            require_session(&ctx).await?;
            classes(&ctx, command).await
        }
        Commands::Docs { command } => {
            require_session(&ctx).await?;
            docs(&ctx, command).await
        }
        Commands::Chat { command } => {
            require_session(&ctx).await?;
            chat(&ctx, command).await
        }
        Commands::Usage => {
            require_session(&ctx).await?;
            usage(&ctx).await
        }
        Commands::Validate { .. } => Ok(()),
    }
}

/// Restores the saved session or fails with a hint.
async fn require_session(ctx: &AppContext) -> Result<()> {
    if !ctx.startup().await {
        match ctx.auth().error() {
            Some(reason) => bail!("Session expired ({reason}). Run `studhelper login`."),
            None => bail!("Not logged in. Run `studhelper login` first."),
        }
    }
    Ok(())
}

// ==================== Auth Commands ====================

async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let user = ctx.auth_facade().login(email, password).await?;
    println!("Logged in as {} <{}>", user.username, user.email);
    Ok(())
}

async fn register(ctx: &AppContext, req: &RegisterRequest) -> Result<()> {
    let user = ctx.auth_facade().register(req).await?;
    println!("Welcome, {}! Your account is ready.", user.username);
    Ok(())
}

async fn whoami(ctx: &AppContext) -> Result<()> {
    if !ctx.startup().await {
        println!("Not logged in");
        return Ok(());
    }
    if let Some(user) = ctx.auth().user() {
        println!("{} <{}>", user.username, user.email);
        if let Some(name) = user.full_name {
            println!("  Name: {name}");
        }
        if let Some(class) = ctx.classes().current_class() {
            println!("  Selected class: {} (#{})", class.name, class.id);
        }
    }
    Ok(())
}

// ==================== Class Commands ====================

async fn classes(ctx: &AppContext, command: ClassCommands) -> Result<()> {
    let facade = ctx.classes_facade();
    match command {
        ClassCommands::List => {
            let selected = ctx.classes().selected_class_id();
            let classes = facade.classes();
            if classes.is_empty() {
                println!("No classes yet. Create one or join with a code.");
            }
            for class in classes {
                let marker = if Some(class.id) == selected { "*" } else { " " };
                println!(
                    "{marker} #{:<5} {:<30} code {}  ({} docs, {} members)",
                    class.id, class.name, class.code, class.document_count, class.member_count
                );
            }
        }
        ClassCommands::Show { id } => {
            let class = ctx.classes().fetch_class_details(id).await?;
            print_class(&class);
        }
        ClassCommands::Create {
            name,
            description,
            files,
            videos,
        } => {
            let store = ctx.classes();
            store.clear_upload_queue();
            for path in files {
                let file = UploadFile::from_path(&path)
                    .await
                    .with_context(|| format!("failed to read {path}"))?;
                store.add_to_upload_queue(file, None)?;
            }
            for url in videos {
                store.add_video_to_upload_queue(&url, None)?;
            }
            let class = facade.create_class(&name, description).await?;
            println!("Created class {} (#{}), join code {}", class.name, class.id, class.code);
        }
        ClassCommands::Delete { id } => {
            facade.delete_class(id).await?;
            println!("Deleted class #{id}");
        }
        ClassCommands::Join { code } => {
            let class = facade.join_class(&code).await?;
            println!("Joined {} (#{})", class.name, class.id);
        }
        ClassCommands::Select { id } => {
            if ctx.classes().class(id).is_none() {
                bail!("No class #{id} among your classes");
            }
            facade.select_class(id);
            println!("Selected class #{id}");
        }
        ClassCommands::Members { id } => {
            let members = ctx.api().classes().members(id).await?;
            for m in members {
                let role = if m.is_manager { "manager" } else { "member" };
                println!("#{:<5} {:<20} {role}", m.user_id, m.username);
            }
        }
    }
    Ok(())
}

fn print_class(class: &ClassRecord) {
    println!("{} (#{})", class.name, class.id);
    println!("  Code: {}", class.code);
    if let Some(description) = &class.description {
        println!("  {description}");
    }
    println!("  Documents:");
    if class.documents.is_empty() {
        println!("    (none)");
    }
    for doc in &class.documents {
        print_document(doc);
    }
}

fn print_document(doc: &DocumentRecord) {
    let kind = if doc.is_video() { "video" } else { "file" };
    print!("    #{:<5} [{kind}] {}", doc.id, doc.filename);
    if let Some(description) = &doc.description {
        print!(" - {description}");
    }
    if let Some(status) = &doc.processing_status {
        print!(" ({status})");
    }
    println!();
}

// ==================== Document Commands ====================

async fn docs(ctx: &AppContext, command: DocCommands) -> Result<()> {
    let store = ctx.classes();
    match command {
        DocCommands::Upload {
            class_id,
            path,
            description,
        } => {
            let file = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("failed to read {path}"))?;
            let doc = ctx
                .file_upload()
                .upload_class_document(class_id, file, description.as_deref())
                .await?;
            println!("Uploaded {} (#{})", doc.filename, doc.id);
        }
        DocCommands::Youtube {
            class_id,
            url,
            description,
        } => {
            let doc = store
                .upload_youtube_video(class_id, &url, description.as_deref())
                .await?;
            println!("Added video #{}", doc.id);
        }
        DocCommands::Describe {
            class_id,
            document_id,
            description,
        } => {
            store
                .update_document_description(class_id, document_id, description.as_deref())
                .await?;
            println!("Updated document #{document_id}");
        }
        DocCommands::Delete {
            class_id,
            document_id,
        } => {
            store.delete_document(class_id, document_id).await?;
            println!("Deleted document #{document_id}");
        }
        DocCommands::Edit {
            class_id,
            add,
            remove,
            describe,
        } => {
            store.load_queue_from_class(class_id).await?;
            for path in add {
                let file = UploadFile::from_path(&path)
                    .await
                    .with_context(|| format!("failed to read {path}"))?;
                store.add_to_upload_queue(file, None)?;
            }
            for entry in describe {
                let (id, text) = parse_description(&entry)?;
                if !store.update_file_description(id, Some(text.to_string())) {
                    bail!("Document #{id} is not in class #{class_id}");
                }
            }
            for id in remove {
                if !store.remove_from_upload_queue(id) {
                    bail!("Document #{id} is not in class #{class_id}");
                }
            }
            let summary = store.submit_upload_queue(class_id).await?;
            println!(
                "Uploaded {}, updated {}, deleted {}",
                summary.uploaded, summary.updated, summary.deleted
            );
        }
    }
    Ok(())
}

/// Splits `ID=TEXT`.
fn parse_description(entry: &str) -> Result<(u64, &str)> {
    let (id, text) = entry
        .split_once('=')
        .with_context(|| format!("expected ID=TEXT, got {entry:?}"))?;
    let id = id
        .trim()
        .parse()
        .with_context(|| format!("invalid document ID {id:?}"))?;
    Ok((id, text))
}

// ==================== Chat Commands ====================

fn target_class(ctx: &AppContext, class: Option<ClassId>) -> Result<ClassId> {
    if let Some(id) = class {
        ctx.classes().select_class(id);
        return Ok(id);
    }
    ctx.classes()
        .selected_class_id()
        .context("No class selected. Pass --class or run `studhelper classes select`.")
}

async fn chat(ctx: &AppContext, command: ChatCommands) -> Result<()> {
    match command {
        ChatCommands::Sessions { class } => {
            target_class(ctx, class)?;
            let sessions = ctx.classes().fetch_chat_sessions().await?;
            if sessions.is_empty() {
                println!("No chat sessions");
            }
            for s in sessions {
                println!("#{:<5} {:<40} {} messages", s.id, s.title, s.message_count);
            }
        }
        ChatCommands::New { title, class } => {
            target_class(ctx, class)?;
            let session = ctx.classes().create_chat_session(&title).await?;
            println!("Opened chat #{}", session.id);
        }
        ChatCommands::Send {
            session_id,
            message,
        } => {
            let reply = ctx.api().chat().send(session_id, &message).await?;
            println!("{}", reply.ai_response.content);
            tracing::info!(
                tokens = reply.ai_response.tokens_used,
                response_time_ms = reply.response_time_ms,
                "Reply received"
            );
        }
        ChatCommands::History { session_id } => {
            let messages = ctx.api().chat().messages(session_id).await?;
            for m in messages {
                let who = if m.is_user { "you" } else { "studhelper" };
                println!("[{who}] {}", m.content);
            }
        }
    }
    Ok(())
}

// ==================== Usage ====================

async fn usage(ctx: &AppContext) -> Result<()> {
    let stats = ctx.api().usage().my_usage().await?;
    for s in stats {
        println!("Today:      {:>8} / {}", s.daily_tokens_used, s.daily_limit);
        println!("This week:  {:>8} / {}", s.weekly_tokens_used, s.weekly_limit);
        println!("This month: {:>8} / {}", s.monthly_tokens_used, s.monthly_limit);
    }
    Ok(())
}

// ==================== Validation ====================

async fn validate(kind: ValidateKind, value: &str) -> Result<()> {
    let result = check(kind, value).await?;
    if result.is_valid() {
        println!("valid");
        Ok(())
    } else {
        for error in result.errors() {
            println!("invalid: {error}");
        }
        bail!("{} rule(s) failed", result.errors().len())
    }
}

async fn check(kind: ValidateKind, value: &str) -> Result<Validation> {
    Ok(match kind {
        ValidateKind::Email => validate_email(value),
        ValidateKind::Password => validate_password(value),
        ValidateKind::Username => validate_username(value),
        ValidateKind::ClassName => validate_class_name(value),
        ValidateKind::Youtube => validate_youtube_url(value),
        ValidateKind::File => {
            let file = UploadFile::from_path(value)
                .await
                .with_context(|| format!("failed to read {value}"))?;
            validate_file_upload(file.size(), &file.mime_type)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description() {
        assert_eq!(parse_description("12=Week 3 notes").unwrap(), (12, "Week 3 notes"));
        assert_eq!(parse_description("4=").unwrap(), (4, ""));
        assert!(parse_description("no-separator").is_err());
        assert!(parse_description("x=text").is_err());
    }

    #[tokio::test]
    async fn test_check_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("notes.pdf");
        let png = dir.path().join("photo.png");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        std::fs::write(&png, [0u8; 8]).unwrap();

        let ok = check(ValidateKind::File, pdf.to_str().unwrap()).await.unwrap();
        assert!(ok.is_valid());

        let bad = check(ValidateKind::File, png.to_str().unwrap()).await.unwrap();
        assert!(bad.error().unwrap().starts_with("File type not supported"));
    }

    #[tokio::test]
    async fn test_check_password_lists_every_rule() {
        let result = check(ValidateKind::Password, "abc").await.unwrap();
        assert_eq!(result.errors().len(), 3);
    }
}
