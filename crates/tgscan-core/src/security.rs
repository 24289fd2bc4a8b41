use crate::domain::UserId;

/// Whether `user_id` may run admin commands.
///
/// An empty allow-list means nobody is an admin.
pub fn is_authorized(user_id: Option<UserId>, allowed_users: &[i64]) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    if allowed_users.is_empty() {
        return false;
    }
    allowed_users.contains(&user_id.0)
}
