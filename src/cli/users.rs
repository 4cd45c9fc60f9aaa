use clap::{Args, Subcommand};

use crate::{
    app::AdminApp,
    cli::{
        ListArgs,
        catalog::flag_filter,
        output::{self, Mutation, Table},
    },
    error::Result,
    forms::{FormMode, UserForm},
    models::{User, UserRole},
    services::user_service,
};

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        role: Option<UserRole>,
        #[arg(long)]
        active: bool,
        /// Only soft-deleted accounts.
        #[arg(long)]
        deleted: bool,
    },
    Get {
        id: i64,
    },
    Create(UserFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Soft delete; see `restore`.
    Delete {
        id: i64,
    },
    Restore {
        id: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct UserFields {
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, env = "ADMIN_NEW_USER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    role: Option<UserRole>,
    #[arg(long)]
    active: Option<bool>,
}

impl UserFields {
    fn apply(self, form: &mut UserForm) {
        if let Some(full_name) = self.full_name {
            form.full_name = full_name;
        }
        if let Some(email) = self.email {
            form.email = email;
        }
        form.password = self.password.or(form.password.take());
        form.phone = self.phone.or(form.phone.take());
        form.role = self.role.unwrap_or(form.role);
        form.is_active = self.active.unwrap_or(form.is_active);
    }
}

pub async fn users(app: &AdminApp, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::List {
            list,
            role,
            active,
            deleted,
        } => {
            let params = list.to_params(
                app,
                vec![
                    ("role", role.map(|r| r.to_string())),
                    ("is_active", flag_filter(active)),
                    ("deleted", flag_filter(deleted)),
                ],
            );
            let page = app
                .list::<User>(&params)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load users"))?;
            let mut table = Table::new(&["ID", "Name", "Email", "Role", "Status", "Last login"]);
            for user in &page.data {
                let status = if user.is_deleted() {
                    "Deleted".to_string()
                } else {
                    output::active_label(user.is_active)
                };
                table.row(vec![
                    user.id.to_string(),
                    user.full_name.clone(),
                    user.email.clone(),
                    user.role.to_string(),
                    status,
                    output::opt(user.last_login),
                ]);
            }
            output::print_page(&page, &table, &params, app.page_size(), "users");
            Ok(())
        }
        UserCommand::Get { id } => {
            let user = app
                .get::<User>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load user"))?;
            output::print_details(&[
                ("ID", user.id.to_string()),
                ("Name", user.full_name.clone()),
                ("Email", user.email.clone()),
                ("Phone", output::opt(user.phone.as_deref())),
                ("Role", user.role.to_string()),
                ("Status", output::active_label(user.is_active)),
                ("Deleted", output::opt(user.deleted_at)),
                ("Last login", output::opt(user.last_login)),
                ("Created", output::opt(user.created_at)),
            ]);
            Ok(())
        }
        UserCommand::Create(fields) => {
            let mut form = UserForm::default();
            fields.apply(&mut form);
            let body = form.into_body(FormMode::Create)?;
            output::report(app.create::<User>(body).await, "User", Mutation::Create)
        }
        UserCommand::Update { id, fields } => {
            let existing = app
                .get::<User>(id)
                .await
                .map_err(|e| output::with_fallback(e, "Failed to load user"))?;
            let mut form = UserForm::from(&existing);
            fields.apply(&mut form);
            let body = form.into_body(FormMode::Edit)?;
            output::report(app.update::<User>(id, body).await, "User", Mutation::Update)
        }
        UserCommand::Delete { id } => {
            let result = app
                .mutate::<User, _>(user_service::delete(app.client(), id))
                .await;
            output::report(result, "User", Mutation::Delete)
        }
        UserCommand::Restore { id } => {
            let result = app
                .mutate::<User, _>(user_service::restore(app.client(), id))
                .await;
            output::report(result, "User", Mutation::Restore)
        }
    }
}
