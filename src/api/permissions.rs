use crate::db::Account;

/// Status code an application is created with; the only state in which the
/// owner may still edit.
pub const INITIAL_STATUS_CODE: &str = "new";

/// Write (update/delete) is open to staff always, and to the owner only
/// while the application has not left its initial status.
#[must_use]
pub fn can_write(actor: &Account, owner_id: i32, status_code: &str) -> bool {
    actor.is_staff || (actor.id == owner_id && status_code == INITIAL_STATUS_CODE)
}

/// Read is open to staff and to the owner, regardless of status.
#[must_use]
pub fn can_read(actor: &Account, owner_id: i32) -> bool {
    actor.is_staff || actor.id == owner_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i32, is_staff: bool) -> Account {
        Account {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            phone: "+77001234567".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            birth_city_id: None,
            is_active: true,
            is_staff,
        }
    }

    #[test]
    fn test_owner_can_write_while_new() {
        let owner = account(1, false);
        assert!(can_write(&owner, 1, "new"));
    }

    #[test]
    fn test_owner_locked_out_after_transition() {
        let owner = account(1, false);
        assert!(!can_write(&owner, 1, "in_review"));
        assert!(!can_write(&owner, 1, "approved"));
        assert!(!can_write(&owner, 1, "rejected"));
    }

    #[test]
    fn test_staff_writes_in_any_state() {
        let staff = account(2, true);
        assert!(can_write(&staff, 1, "new"));
        assert!(can_write(&staff, 1, "approved"));
    }

    #[test]
    fn test_stranger_denied_everything() {
        let stranger = account(3, false);
        assert!(!can_write(&stranger, 1, "new"));
        assert!(!can_read(&stranger, 1));
    }

    #[test]
    fn test_owner_reads_after_lock() {
        let owner = account(1, false);
        assert!(can_read(&owner, 1));
    }
}
