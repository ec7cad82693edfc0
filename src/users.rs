//! User administration rules

use thiserror::Error;

use crate::api::dto::{NewUser, ProfileUpdate};
use crate::models::{Id, Me, Role, User};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserFormError {
    #[error("El nombre de usuario es obligatorio.")]
    MissingUsername,
    #[error("La clave debe tener 6+ caracteres.")]
    ShortPassword,
    #[error("No puedes eliminar tu propio usuario.")]
    SelfDelete,
}

/// Roles offered in selects, with their labels
pub fn role_options() -> Vec<(Role, &'static str)> {
    vec![
        (Role::Owner, "Dueño"),
        (Role::Admin, "Administrador"),
        (Role::Seller, "Vendedor"),
    ]
}

/// Case-insensitive match on username or email
pub fn filter_users<'a>(users: &'a [User], needle: &str) -> Vec<&'a User> {
    let needle = needle.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.username.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for NewUserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Seller,
        }
    }
}

impl NewUserForm {
    pub fn validate(&self) -> Result<NewUser, UserFormError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(UserFormError::MissingUsername);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserFormError::ShortPassword);
        }
        Ok(NewUser {
            username: username.to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role.clone(),
            is_active: true,
        })
    }
}

/// Admins may not delete their own account
pub fn check_delete(me: &Me, target: Id) -> Result<(), UserFormError> {
    if me.id == target {
        Err(UserFormError::SelfDelete)
    } else {
        Ok(())
    }
}

/// Profile edit; a blank password leaves it unchanged, a short one is refused
pub fn profile_update(email: &str, password: &str) -> Result<ProfileUpdate, UserFormError> {
    let password = password.trim();
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserFormError::ShortPassword);
    }
    Ok(ProfileUpdate::new(email, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Id, username: &str, email: &str) -> User {
        User {
            id,
            username: username.into(),
            email: email.into(),
            role: Role::Seller,
            is_active: true,
        }
    }

    #[test]
    fn test_filter_by_username_or_email() {
        let users = vec![
            user(1, "ana", "ana@tienda.cl"),
            user(2, "pedro", "caja2@tienda.cl"),
        ];
        assert_eq!(filter_users(&users, "CAJA").len(), 1);
        assert_eq!(filter_users(&users, "ana")[0].id, 1);
        assert_eq!(filter_users(&users, " ").len(), 2);
    }

    #[test]
    fn test_new_user_validation() {
        let mut form = NewUserForm {
            username: " ".into(),
            password: "secreto".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(UserFormError::MissingUsername));

        form.username = "caja3".into();
        form.password = "12345".into();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "La clave debe tener 6+ caracteres."
        );

        form.password = "123456".into();
        let payload = form.validate().unwrap();
        assert_eq!(payload.role, Role::Seller);
        assert!(payload.is_active);
    }

    #[test]
    fn test_self_delete_guard() {
        let me = Me {
            id: 1,
            username: "admin".into(),
            email: String::new(),
            role: Role::Admin,
            is_staff: false,
            is_superuser: false,
            is_active: true,
        };
        assert_eq!(check_delete(&me, 1), Err(UserFormError::SelfDelete));
        assert!(check_delete(&me, 2).is_ok());
    }

    #[test]
    fn test_profile_update_password_optional() {
        assert!(profile_update("a@b.cl", "").unwrap().password.is_none());
        assert_eq!(profile_update("a@b.cl", "123"), Err(UserFormError::ShortPassword));
    }

    #[test]
    fn test_role_options_labels_match_roles() {
        for (role, label) in role_options() {
            assert_eq!(role.label(), label);
        }
    }
}
