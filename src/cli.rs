use std::path::{Path, PathBuf};
use std::sync::Arc;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use laptophub::config::default_config_path;
use laptophub::protocol::{
    Avatar, Channel, ChangePasswordRequest, Listing, PasswordResetConfirm, ProfileUpdate,
    RegisterRequest, Review, ReviewInput, ReviewPatch, UserProfile,
};
use laptophub::{open_store, ApiClient, ClientConfig, LaptopHubError, Result, Session};
use tracing::debug;

use crate::ui::UI;
use crate::version::format_version_info;
use crate::{
    ChannelArgs, Commands, DeleteAccountArgs, LaptopArgs, LaptopsArgs, LoginArgs, PageArgs,
    PasswordCommand, ProfileCommand, ProfileUpdateArgs, RegisterArgs, ReviewCommand,
    VerifyEmailArgs,
};

/// CLI handler for processing commands
pub struct CliHandler {
    session: Session,
    config: ClientConfig,
    ui: UI,
}

impl CliHandler {
    /// Load configuration and restore any stored session.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(default_config_path);
        let config = ClientConfig::from_file_and_env(Some(&config_path))?;
        debug!(base_url = %config.base_url, "configuration loaded");

        let store = open_store(&config.token_storage);
        let client = Arc::new(ApiClient::new(config.clone())?);

        Ok(Self {
            session: Session::initialize(client, store),
            config,
            ui: UI::new(),
        })
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Laptops(args) => self.handle_laptops(args).await,
            Commands::Laptop(args) => self.handle_laptop(args).await,
            Commands::Channels(args) => self.handle_channels(args).await,
            Commands::Channel(args) => self.handle_channel(args).await,
            Commands::Register(args) => self.handle_register(args).await,
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Logout => self.handle_logout(),
            Commands::Status => self.handle_status().await,
            Commands::Profile(args) => match args.command {
                ProfileCommand::Show => self.handle_profile_show().await,
                ProfileCommand::Update(update) => self.handle_profile_update(update).await,
            },
            Commands::Password(args) => self.handle_password(args.command).await,
            Commands::VerifyEmail(args) => self.handle_verify_email(args).await,
            Commands::ResendVerification => self.handle_resend_verification().await,
            Commands::DeleteAccount(args) => self.handle_delete_account(args).await,
            Commands::Review(args) => self.handle_review(args.command).await,
        }
    }

    /// Cancel background work before the process exits.
    pub fn shutdown(&self) {
        self.session.teardown();
    }

    pub fn report(&self, error: &LaptopHubError) {
        debug!(code = %error.code(), "command failed");
        self.ui.error(&format!("Error: {}", error));
        if error.is_unauthorized() && self.session.is_authenticated() {
            self.ui
                .warning("Your session may have expired. Run `laptophub login` to sign in again.");
        }
    }

    fn client(&self) -> &ApiClient {
        self.session.client()
    }

    fn token(&self) -> Result<String> {
        self.session
            .access_token()
            .ok_or(LaptopHubError::NotAuthenticated)
    }

    // ==================== Browsing ====================

    async fn handle_laptops(&self, args: LaptopsArgs) -> Result<()> {
        let page_size = self.client().page_size();
        let page = self
            .client()
            .laptops()
            .list(args.page, args.query.as_deref())
            .await?;

        if page.results.is_empty() {
            self.ui.info("No laptops found");
            return Ok(());
        }

        self.print_listings(args.page, &page.results);
        self.ui
            .page_footer(args.page, page.page_count(page_size), page.count);
        Ok(())
    }

    async fn handle_laptop(&self, args: LaptopArgs) -> Result<()> {
        let listing = self.client().laptops().retrieve(&args.uuid).await?;
        self.print_listing(&listing);
        Ok(())
    }

    async fn handle_channels(&self, args: PageArgs) -> Result<()> {
        let page_size = self.client().page_size();
        let page = self.client().chats().list(args.page).await?;

        if page.results.is_empty() {
            self.ui.info("No channels found");
            return Ok(());
        }

        let offset = self.page_offset(args.page);
        for (i, channel) in page.results.iter().enumerate() {
            self.ui
                .list_item(offset + i + 1, &channel.title, &self.channel_summary(channel));
        }
        self.ui
            .page_footer(args.page, page.page_count(page_size), page.count);
        Ok(())
    }

    async fn handle_channel(&self, args: ChannelArgs) -> Result<()> {
        let page_size = self.client().page_size();
        let chats = self.client().chats();
        let chat = self.client().chat();
        let (channel, posts) = tokio::join!(
            chats.retrieve(args.channel_id),
            chat.posts(args.channel_id, args.page)
        );
        let channel = channel?;

        let mut content = vec![
            ("Channel", self.ui.format_field(channel.handle().as_deref())),
            ("Details", self.channel_summary(&channel)),
            ("Language", self.ui.format_field(channel.language.as_deref())),
            ("Category", self.ui.format_field(channel.category.as_deref())),
        ];
        if let Some(description) = channel.description.as_deref() {
            content.push(("About", self.ui.format_field(Some(description))));
        }
        self.ui.card(&channel.title, content);

        let posts = posts?;
        if posts.results.is_empty() {
            self.ui.info("This channel has no listings yet");
            return Ok(());
        }
        self.print_listings(args.page, &posts.results);
        self.ui
            .page_footer(args.page, posts.page_count(page_size), posts.count);
        Ok(())
    }

    // ==================== Account ====================

    async fn handle_register(&self, args: RegisterArgs) -> Result<()> {
        let theme = ColorfulTheme::default();
        let email = prompt_if_missing(&theme, args.email, "Email")?;
        let first_name = prompt_if_missing(&theme, args.first_name, "First name")?;
        let last_name = prompt_if_missing(&theme, args.last_name, "Last name")?;
        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?;

        let request = RegisterRequest {
            first_name,
            last_name,
            email,
            phone_number: args.phone.filter(|p| !p.trim().is_empty()),
            password,
        };
        let registered = self.session.register(&request).await?;

        self.ui
            .success(&format!("Account created for {}", registered.email));
        self.ui
            .info("Check your inbox to verify the address, then run `laptophub login`.");
        Ok(())
    }

    async fn handle_login(&self, args: LoginArgs) -> Result<()> {
        let theme = ColorfulTheme::default();
        let email = prompt_if_missing(&theme, args.email, "Email")?
            .trim()
            .to_string();
        let password = match args.password {
            Some(password) => password,
            None => Password::with_theme(&theme)
                .with_prompt("Password")
                .interact()?,
        };

        match self.session.login(&email, &password).await? {
            Some(profile) => self
                .ui
                .success(&format!("Signed in as {}", profile.display_name())),
            None => self.ui.success(&format!("Signed in as {}", email)),
        }
        Ok(())
    }

    fn handle_logout(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            self.ui.info("Not signed in");
            return Ok(());
        }
        self.session.logout();
        self.ui.success("Signed out");
        Ok(())
    }

    async fn handle_status(&self) -> Result<()> {
        self.session.settled().await;
        let state = self.session.snapshot();

        let mut content = vec![
            ("Version", format_version_info()),
            ("Server", self.config.base_url.clone()),
            ("Session", self.ui.format_auth_status(state.is_authenticated())),
        ];

        if state.is_authenticated() {
            content.push(("Email", self.ui.format_field(state.user.as_deref())));
            match &state.profile {
                Some(profile) => {
                    content.push(("Name", profile.display_name()));
                    content.push(("Email status", self.ui.format_verified(profile.is_verified)));
                }
                None => content.push(("Profile", "Unavailable".to_string())),
            }
        }

        let storage = if self.config.token_storage.enabled {
            self.config.token_storage.resolved_path().display().to_string()
        } else {
            "Memory only".to_string()
        };
        content.push(("Storage", storage));

        self.ui.card("Status", content);
        Ok(())
    }

    async fn handle_profile_show(&self) -> Result<()> {
        self.token()?;
        match self.session.refresh_profile().await? {
            Some(profile) => self.print_profile(&profile),
            None => self.ui.info("No profile found for this account"),
        }
        Ok(())
    }

    async fn handle_profile_update(&self, args: ProfileUpdateArgs) -> Result<()> {
        let token = self.token()?;
        let profile_picture = match &args.avatar {
            Some(path) => Some(read_avatar(path)?),
            None => None,
        };

        let update = ProfileUpdate {
            first_name: args.first_name,
            last_name: args.last_name,
            phone_number: args.phone,
            bio: args.bio,
            profile_picture,
        };
        let profile = self.client().profile().update(&token, update).await?;

        self.ui.success("Profile updated");
        self.print_profile(&profile);
        Ok(())
    }

    async fn handle_password(&self, command: PasswordCommand) -> Result<()> {
        let theme = ColorfulTheme::default();
        match command {
            PasswordCommand::Change => {
                let token = self.token()?;
                let old_password = Password::with_theme(&theme)
                    .with_prompt("Current password")
                    .interact()?;
                let new_password = new_password_prompt(&theme)?;
                self.client()
                    .auth()
                    .change_password(
                        &token,
                        &ChangePasswordRequest {
                            old_password,
                            new_password,
                        },
                    )
                    .await?;
                self.ui.success("Password changed");
            }
            PasswordCommand::ResetRequest { email } => {
                let email = prompt_if_missing(&theme, email, "Email")?;
                self.client().auth().request_password_reset(&email).await?;
                self.ui.success(&format!(
                    "If an account exists for {}, a reset link is on its way",
                    email.trim()
                ));
            }
            PasswordCommand::ResetConfirm { uid, token } => {
                let new_password = new_password_prompt(&theme)?;
                self.client()
                    .auth()
                    .confirm_password_reset(&PasswordResetConfirm {
                        token,
                        uid,
                        new_password,
                    })
                    .await?;
                self.ui.success("Password reset. You can now sign in.");
            }
        }
        Ok(())
    }

    async fn handle_verify_email(&self, args: VerifyEmailArgs) -> Result<()> {
        self.client()
            .auth()
            .verify_email(&args.uid, &args.token)
            .await?;
        self.ui.success("Email verified");
        Ok(())
    }

    async fn handle_resend_verification(&self) -> Result<()> {
        let token = self.token()?;
        self.client().auth().resend_verification(&token).await?;
        self.ui.success("Verification email sent");
        Ok(())
    }

    async fn handle_delete_account(&self, args: DeleteAccountArgs) -> Result<()> {
        self.token()?;
        if !args.yes {
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Delete your account permanently? This cannot be undone")
                .default(false)
                .interact()?;
            if !proceed {
                self.ui.info("Account deletion cancelled");
                return Ok(());
            }
        }

        self.session.delete_account().await?;
        self.ui.success("Account deleted");
        Ok(())
    }

    // ==================== Reviews ====================

    async fn handle_review(&self, command: ReviewCommand) -> Result<()> {
        let token = self.token()?;
        let reviews = self.client().reviews();

        match command {
            ReviewCommand::Add {
                uuid,
                rating,
                comment,
            } => {
                let input = ReviewInput::new(rating, comment.as_deref());
                let review = reviews.create(&uuid, &token, &input).await?;
                self.ui.success(&format!("Review #{} posted", review.id));
            }
            ReviewCommand::Delete { review_id } => {
                reviews.destroy(review_id, &token).await?;
                self.ui.success(&format!("Review #{} deleted", review_id));
            }
            ReviewCommand::Mine { uuid } => {
                let review = reviews.get_mine(&uuid, &token).await?;
                self.print_review_card(&review);
            }
            ReviewCommand::UpdateMine {
                uuid,
                rating,
                comment,
            } => {
                let patch = ReviewPatch { rating, comment };
                if patch == ReviewPatch::default() {
                    return Err(LaptopHubError::validation(
                        "Give --rating or --comment to update",
                    ));
                }
                let review = reviews.update_mine(&uuid, &token, &patch).await?;
                self.ui.success("Review updated");
                self.print_review_card(&review);
            }
            ReviewCommand::DeleteMine { uuid } => {
                reviews.delete_mine(&uuid, &token).await?;
                self.ui.success("Review deleted");
            }
        }
        Ok(())
    }

    // ==================== Output ====================

    fn page_offset(&self, page: u32) -> usize {
        (page.max(1) as usize - 1) * self.client().page_size() as usize
    }

    fn print_listings(&self, page: u32, listings: &[Listing]) {
        let offset = self.page_offset(page);
        for (i, listing) in listings.iter().enumerate() {
            let details = format!(
                "{} | {} | {} | {}",
                self.ui.format_price(listing.price.as_deref()),
                self.ui.format_sale_state(listing.status.as_deref()),
                listing.channel_name,
                listing.uuid
            );
            self.ui.list_item(offset + i + 1, &listing.title, &details);
        }
    }

    fn print_listing(&self, listing: &Listing) {
        let mut content = vec![
            ("Price", self.ui.format_price(listing.price.as_deref())),
            ("Status", self.ui.format_sale_state(listing.status.as_deref())),
            ("Rating", self.ui.format_rating(listing.average_rating.as_deref())),
            ("Channel", listing.channel_name.clone()),
            ("Posted", listing.posted_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ];
        for (label, value) in listing.specs() {
            content.push((label, value.to_string()));
        }
        content.push(("Images", listing.images.len().to_string()));
        self.ui.card(&listing.title, content);

        if let Some(description) = listing.description.as_deref().map(str::trim) {
            if !description.is_empty() {
                println!("{}", description);
                self.ui.blank_line();
            }
        }

        if !listing.reviews.is_empty() {
            self.ui.header("Reviews");
            for review in &listing.reviews {
                self.print_review_line(review);
            }
        }

        if !listing.similar_items.is_empty() {
            self.ui.header("Similar laptops");
            for (i, item) in listing.similar_items.iter().enumerate() {
                let similar = &item.similar_laptop;
                let details = format!(
                    "{:.0}% match | {} | {}",
                    item.score.clamp(0.0, 1.0) * 100.0,
                    self.ui.format_price(similar.price.as_deref()),
                    similar.uuid
                );
                self.ui.list_item(i + 1, &similar.title, &details);
            }
        }
    }

    fn print_review_line(&self, review: &Review) {
        let rating = review.rating.to_string();
        let stars = self.ui.format_rating(Some(&rating));
        let comment = review.comment.as_deref().unwrap_or("").trim();
        if comment.is_empty() {
            println!("{} {}", stars, review.user);
        } else {
            println!("{} {}: {}", stars, review.user, comment);
        }
    }

    fn print_review_card(&self, review: &Review) {
        let rating = review.rating.to_string();
        self.ui.card(
            &format!("Review #{}", review.id),
            vec![
                ("Rating", self.ui.format_rating(Some(&rating))),
                ("Comment", self.ui.format_field(review.comment.as_deref())),
                ("By", review.user.clone()),
                ("Written", review.created_at.format("%Y-%m-%d").to_string()),
            ],
        );
    }

    fn print_profile(&self, profile: &UserProfile) {
        self.ui.card(
            &profile.display_name(),
            vec![
                ("Email", profile.email.clone()),
                ("Email status", self.ui.format_verified(profile.is_verified)),
                ("Phone", self.ui.format_field(Some(&profile.phone_number))),
                ("Bio", self.ui.format_field(Some(&profile.bio))),
                ("Picture", self.ui.format_field(profile.profile_picture.as_deref())),
                ("Joined", profile.date_joined.format("%Y-%m-%d").to_string()),
            ],
        );
    }

    fn channel_summary(&self, channel: &Channel) -> String {
        let mut parts = Vec::new();
        if let Some(handle) = channel.handle() {
            parts.push(handle);
        }
        if let Some(members) = channel.member_count {
            parts.push(format!("{} members", members));
        }
        if channel.is_verified {
            parts.push("verified".to_string());
        }
        if channel.is_private {
            parts.push("private".to_string());
        }
        parts.push(format!("id {}", channel.channel_id));
        parts.join(" | ")
    }
}

fn prompt_if_missing(theme: &ColorfulTheme, value: Option<String>, prompt: &str) -> Result<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .interact_text()?),
    }
}

fn new_password_prompt(theme: &ColorfulTheme) -> Result<String> {
    Ok(Password::with_theme(theme)
        .with_prompt("New password")
        .with_confirmation("Repeat new password", "Passwords do not match")
        .interact()?)
}

/// Load an image file for upload as the profile picture.
fn read_avatar(path: &Path) -> Result<Avatar> {
    let bytes = std::fs::read(path).map_err(|e| {
        LaptopHubError::validation(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());

    Ok(Avatar {
        mime_type: avatar_mime(path).map(String::from),
        file_name,
        bytes,
    })
}

fn avatar_mime(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_mime() {
        assert_eq!(avatar_mime(Path::new("me.PNG")), Some("image/png"));
        assert_eq!(avatar_mime(Path::new("/tmp/me.jpeg")), Some("image/jpeg"));
        assert_eq!(avatar_mime(Path::new("notes.txt")), None);
        assert_eq!(avatar_mime(Path::new("noext")), None);
    }

    #[test]
    fn test_read_avatar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.webp");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let avatar = read_avatar(&path).unwrap();
        assert_eq!(avatar.file_name, "face.webp");
        assert_eq!(avatar.mime_type.as_deref(), Some("image/webp"));
        assert_eq!(avatar.bytes, vec![1, 2, 3]);

        assert!(read_avatar(&dir.path().join("missing.png")).is_err());
    }
}
