//! Theme queries and mutations.

use sea_orm::prelude::DateTime;
use sea_orm::sea_query::{CaseStatement, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::{theme, user};
use crate::theme::{
    ListingOrder, PriorityAction, ThemeStatus, PRIORITY_DEFAULT, PRIORITY_MAX, PRIORITY_MIN,
};

/// A theme together with its creator's login, if the creator still exists.
pub type ThemeRow = (theme::Model, Option<user::Model>);

/// Request-scoped access to the themes table.
pub struct ThemeStore<'a> {
    db: &'a DatabaseConnection,
}

fn now() -> DateTime {
    chrono::Utc::now().naive_utc()
}

/// Column stamped when a theme enters `status`.
fn stamp_column(status: ThemeStatus) -> Option<theme::Column> {
    match status {
        ThemeStatus::Current => Some(theme::Column::CurrentAt),
        ThemeStatus::Discussed => Some(theme::Column::DiscussedAt),
        ThemeStatus::Regular => None,
    }
}

impl<'a> ThemeStore<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All themes with `status`, joined with their creator, in listing order.
    pub async fn list_by_status(&self, status: ThemeStatus) -> Result<Vec<ThemeRow>, DbErr> {
        let query = theme::Entity::find()
            .filter(theme::Column::Status.eq(status.code()))
            .find_also_related(user::Entity);

        let query = match status.listing_order() {
            ListingOrder::Unordered => query,
            ListingOrder::PriorityDesc => query.order_by_desc(theme::Column::Priority),
            ListingOrder::UpdatedAsc => query
                .order_by_asc(theme::Column::Updated)
                .order_by_asc(theme::Column::Id),
        };

        query.all(self.db).await
    }

    pub async fn user_id_by_login(&self, login: &str) -> Result<Option<i32>, DbErr> {
        user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(user::Column::Login.eq(login))
            .into_tuple::<i32>()
            .one(self.db)
            .await
    }

    /// Insert a new regular theme.
    pub async fn create(&self, description: &str, creator_id: i32) -> Result<theme::Model, DbErr> {
        let now = now();
        let new_theme = theme::ActiveModel {
            title: Set(String::new()),
            url: Set(String::new()),
            description: Set(description.to_string()),
            rev: Set(1),
            created: Set(now),
            created_by: Set(creator_id),
            updated: Set(now),
            updated_by: Set(creator_id),
            current_at: Set(now),
            discussed_at: Set(now),
            status: Set(ThemeStatus::Regular.code().to_string()),
            priority: Set(PRIORITY_DEFAULT),
            ..Default::default()
        };

        new_theme.insert(self.db).await
    }

    #[cfg(test)]
    pub async fn find(&self, id: i32) -> Result<Option<theme::Model>, DbErr> {
        theme::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn description(&self, id: i32) -> Result<Option<String>, DbErr> {
        theme::Entity::find_by_id(id)
            .select_only()
            .column(theme::Column::Description)
            .into_tuple::<String>()
            .one(self.db)
            .await
    }

    /// Replace the description and bump the revision. Returns whether a row
    /// was updated.
    pub async fn update_description(&self, id: i32, description: &str) -> Result<bool, DbErr> {
        let result = theme::Entity::update_many()
            .col_expr(theme::Column::Description, Expr::value(description))
            .col_expr(theme::Column::Rev, Expr::col(theme::Column::Rev).add(1))
            .col_expr(theme::Column::Updated, Expr::value(now()))
            .filter(theme::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Move a theme into `target` if its current status allows it.
    ///
    /// Returns `false` when the theme does not exist or the transition is
    /// not in the table; nothing is written in that case.
    pub async fn transition(&self, id: i32, target: ThemeStatus) -> Result<bool, DbErr> {
        let now = now();
        let sources = target.sources().iter().map(|s| s.code());

        let mut update = theme::Entity::update_many()
            .col_expr(theme::Column::Status, Expr::value(target.code()))
            .col_expr(theme::Column::Updated, Expr::value(now));
        if let Some(column) = stamp_column(target) {
            update = update.col_expr(column, Expr::value(now));
        }

        let result = update
            .filter(theme::Column::Id.eq(id))
            .filter(theme::Column::Status.is_in(sources))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Move priority one step in `action`'s direction, clamped to
    /// [`PRIORITY_MIN`], [`PRIORITY_MAX`]. Status is not checked.
    pub async fn adjust_priority(&self, id: i32, action: PriorityAction) -> Result<bool, DbErr> {
        let delta = action.delta();
        let clamped = CaseStatement::new()
            .case(
                Expr::col(theme::Column::Priority).gt(PRIORITY_MAX - delta),
                PRIORITY_MAX,
            )
            .case(
                Expr::col(theme::Column::Priority).lt(PRIORITY_MIN - delta),
                PRIORITY_MIN,
            )
            .finally(Expr::col(theme::Column::Priority).add(delta));

        let result = theme::Entity::update_many()
            .col_expr(theme::Column::Priority, clamped.into())
            .col_expr(theme::Column::Updated, Expr::value(now()))
            .filter(theme::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Delete every discussed theme. Returns the number removed.
    pub async fn clear_discussed(&self) -> Result<u64, DbErr> {
        let result = theme::Entity::delete_many()
            .filter(theme::Column::Status.eq(ThemeStatus::Discussed.code()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Descriptions of discussed themes, oldest update first.
    pub async fn discussed_descriptions(&self) -> Result<Vec<String>, DbErr> {
        theme::Entity::find()
            .select_only()
            .column(theme::Column::Description)
            .filter(theme::Column::Status.eq(ThemeStatus::Discussed.code()))
            .order_by_asc(theme::Column::Updated)
            .order_by_asc(theme::Column::Id)
            .into_tuple::<String>()
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ensure_user, test_database};

    async fn seed(store: &ThemeStore<'_>, creator: i32, descriptions: &[&str]) -> Vec<i32> {
        let mut ids = Vec::new();
        for desc in descriptions {
            ids.push(store.create(desc, creator).await.unwrap().id);
        }
        ids
    }

    async fn set_priority(db: &DatabaseConnection, id: i32, priority: i32) {
        theme::Entity::update_many()
            .col_expr(theme::Column::Priority, Expr::value(priority))
            .filter(theme::Column::Id.eq(id))
            .exec(db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);

        let created = store
            .create("See https://example.com/a for details", admin)
            .await
            .unwrap();

        let stored = store.find(created.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "See https://example.com/a for details");
        assert_eq!(stored.status, "r");
        assert_eq!(stored.priority, 30);
        assert_eq!(stored.rev, 1);
        assert_eq!(stored.created_by, admin);
        assert_eq!(stored.updated_by, admin);
        assert!(stored.title.is_empty());
        assert!(stored.url.is_empty());
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);

        assert_eq!(store.user_id_by_login("admin").await.unwrap(), Some(admin));
        assert_eq!(store.user_id_by_login("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_description_bumps_revision() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let id = seed(&store, admin, &["first"]).await[0];
        store.adjust_priority(id, PriorityAction::Up).await.unwrap();
        store.transition(id, ThemeStatus::Current).await.unwrap();

        assert!(store.update_description(id, "second").await.unwrap());
        let after = store.find(id).await.unwrap().unwrap();
        assert_eq!(after.description, "second");
        assert_eq!(after.rev, 2);
        assert_eq!(after.status, "c");
        assert_eq!(after.priority, 40);

        store.update_description(id, "third").await.unwrap();
        assert_eq!(store.find(id).await.unwrap().unwrap().rev, 3);
        assert_eq!(store.description(id).await.unwrap().as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn test_update_missing_theme() {
        let db = test_database().await;
        let store = ThemeStore::new(&db);

        assert!(!store.update_description(42, "nothing").await.unwrap());
        assert_eq!(store.description(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transitions_follow_table() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let id = seed(&store, admin, &["topic"]).await[0];

        assert!(store.transition(id, ThemeStatus::Current).await.unwrap());
        assert_eq!(store.find(id).await.unwrap().unwrap().status, "c");

        // current -> current is not a transition
        assert!(!store.transition(id, ThemeStatus::Current).await.unwrap());

        assert!(store.transition(id, ThemeStatus::Discussed).await.unwrap());
        assert_eq!(store.find(id).await.unwrap().unwrap().status, "d");

        // discussed -> current is not allowed
        assert!(!store.transition(id, ThemeStatus::Current).await.unwrap());
        assert_eq!(store.find(id).await.unwrap().unwrap().status, "d");

        assert!(store.transition(id, ThemeStatus::Regular).await.unwrap());
        assert_eq!(store.find(id).await.unwrap().unwrap().status, "r");

        assert!(!store.transition(999, ThemeStatus::Discussed).await.unwrap());
    }

    #[tokio::test]
    async fn test_listing_groups_and_order() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let ids = seed(&store, admin, &["low", "high", "mid", "now"]).await;
        set_priority(&db, ids[0], 10).await;
        set_priority(&db, ids[1], 50).await;
        store.transition(ids[3], ThemeStatus::Current).await.unwrap();

        let current = store.list_by_status(ThemeStatus::Current).await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].0.id, ids[3]);
        assert_eq!(current[0].1.as_ref().map(|u| u.login.as_str()), Some("admin"));

        let regular: Vec<i32> = store
            .list_by_status(ThemeStatus::Regular)
            .await
            .unwrap()
            .into_iter()
            .map(|(t, _)| t.id)
            .collect();
        assert_eq!(regular, vec![ids[1], ids[2], ids[0]]);

        // back to regular lands among its peers by priority
        store.transition(ids[3], ThemeStatus::Regular).await.unwrap();
        set_priority(&db, ids[3], 40).await;
        assert!(store.list_by_status(ThemeStatus::Current).await.unwrap().is_empty());
        let regular: Vec<i32> = store
            .list_by_status(ThemeStatus::Regular)
            .await
            .unwrap()
            .into_iter()
            .map(|(t, _)| t.id)
            .collect();
        assert_eq!(regular, vec![ids[1], ids[3], ids[2], ids[0]]);
    }

    #[tokio::test]
    async fn test_priority_clamped() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let id = seed(&store, admin, &["topic"]).await[0];

        for _ in 0..5 {
            store.adjust_priority(id, PriorityAction::Up).await.unwrap();
        }
        assert_eq!(store.find(id).await.unwrap().unwrap().priority, 50);

        store.adjust_priority(id, PriorityAction::Down).await.unwrap();
        assert_eq!(store.find(id).await.unwrap().unwrap().priority, 40);

        for _ in 0..10 {
            store.adjust_priority(id, PriorityAction::Down).await.unwrap();
        }
        assert_eq!(store.find(id).await.unwrap().unwrap().priority, 10);

        store.adjust_priority(id, PriorityAction::Up).await.unwrap();
        assert_eq!(store.find(id).await.unwrap().unwrap().priority, 20);
    }

    #[tokio::test]
    async fn test_priority_ignores_status() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let id = seed(&store, admin, &["topic"]).await[0];
        store.transition(id, ThemeStatus::Discussed).await.unwrap();

        assert!(store.adjust_priority(id, PriorityAction::Down).await.unwrap());
        assert_eq!(store.find(id).await.unwrap().unwrap().priority, 20);
    }

    #[tokio::test]
    async fn test_clear_discussed_only() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let ids = seed(&store, admin, &["a", "b", "c", "d"]).await;
        store.transition(ids[0], ThemeStatus::Discussed).await.unwrap();
        store.transition(ids[1], ThemeStatus::Discussed).await.unwrap();
        store.transition(ids[2], ThemeStatus::Current).await.unwrap();

        assert_eq!(store.clear_discussed().await.unwrap(), 2);

        assert!(store.find(ids[0]).await.unwrap().is_none());
        assert!(store.find(ids[1]).await.unwrap().is_none());
        assert!(store.find(ids[2]).await.unwrap().is_some());
        assert!(store.find(ids[3]).await.unwrap().is_some());
        assert_eq!(store.clear_discussed().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_discussed_descriptions_in_update_order() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let ids = seed(&store, admin, &["first", "second", "kept"]).await;
        store.transition(ids[0], ThemeStatus::Discussed).await.unwrap();
        store.transition(ids[1], ThemeStatus::Discussed).await.unwrap();

        // Force distinct update times regardless of clock resolution
        let epoch = DateTime::default();
        for (id, secs) in [(ids[0], 200), (ids[1], 100)] {
            theme::Entity::update_many()
                .col_expr(
                    theme::Column::Updated,
                    Expr::value(epoch + chrono::Duration::seconds(secs)),
                )
                .filter(theme::Column::Id.eq(id))
                .exec(&db)
                .await
                .unwrap();
        }

        let descriptions = store.discussed_descriptions().await.unwrap();
        assert_eq!(descriptions, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_discussed_order_follows_marking_within_one_second() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let ids = seed(&store, admin, &["older https://a.example", "newer https://b.example"]).await;

        store.transition(ids[1], ThemeStatus::Discussed).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.transition(ids[0], ThemeStatus::Discussed).await.unwrap();

        assert_eq!(
            store.discussed_descriptions().await.unwrap(),
            vec!["newer https://b.example", "older https://a.example"]
        );
        let listed: Vec<i32> = store
            .list_by_status(ThemeStatus::Discussed)
            .await
            .unwrap()
            .into_iter()
            .map(|(t, _)| t.id)
            .collect();
        assert_eq!(listed, vec![ids[1], ids[0]]);
    }

    async fn reset_timestamps(db: &DatabaseConnection, id: i32) {
        let epoch = DateTime::default();
        theme::Entity::update_many()
            .col_expr(theme::Column::Updated, Expr::value(epoch))
            .col_expr(theme::Column::CurrentAt, Expr::value(epoch))
            .col_expr(theme::Column::DiscussedAt, Expr::value(epoch))
            .filter(theme::Column::Id.eq(id))
            .exec(db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mutations_stamp_timestamps() {
        let db = test_database().await;
        let admin = ensure_user(&db, "admin").await.unwrap();
        let store = ThemeStore::new(&db);
        let id = seed(&store, admin, &["topic"]).await[0];
        let epoch = DateTime::default();

        reset_timestamps(&db, id).await;
        store.transition(id, ThemeStatus::Current).await.unwrap();
        let stored = store.find(id).await.unwrap().unwrap();
        assert!(stored.updated > epoch);
        assert!(stored.current_at > epoch);
        assert_eq!(stored.discussed_at, epoch);

        reset_timestamps(&db, id).await;
        store.transition(id, ThemeStatus::Discussed).await.unwrap();
        let stored = store.find(id).await.unwrap().unwrap();
        assert!(stored.updated > epoch);
        assert!(stored.discussed_at > epoch);
        assert_eq!(stored.current_at, epoch);

        reset_timestamps(&db, id).await;
        store.transition(id, ThemeStatus::Regular).await.unwrap();
        let stored = store.find(id).await.unwrap().unwrap();
        assert!(stored.updated > epoch);
        assert_eq!(stored.current_at, epoch);
        assert_eq!(stored.discussed_at, epoch);

        reset_timestamps(&db, id).await;
        store.update_description(id, "edited").await.unwrap();
        let stored = store.find(id).await.unwrap().unwrap();
        assert!(stored.updated > epoch);
        assert_eq!(stored.current_at, epoch);

        reset_timestamps(&db, id).await;
        store.adjust_priority(id, PriorityAction::Up).await.unwrap();
        let stored = store.find(id).await.unwrap().unwrap();
        assert!(stored.updated > epoch);
        assert_eq!(stored.discussed_at, epoch);
    }
}
