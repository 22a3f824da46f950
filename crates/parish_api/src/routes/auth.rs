//! Registration, login, and token verification.
//!
//! These are the only operations that run without a [`RequestContext`]:
//! they are how a caller obtains one.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::password::{hash_password, verify_password};
use crate::routes::users::present_user;
use crate::service::Service;
use parish_core::model::{User, UserRole};
use parish_core::{Entity, FieldMap, Kind, Meta, Validator};
use serde::{Deserialize, Serialize};

/// Payload for [`Service::register`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Sign-in name, 4 to 50 characters.
    pub username: String,
    /// Contact email, unique across accounts.
    pub email: String,
    /// Plain password, at least 8 characters. Hashed before storage.
    pub password: String,
    /// Requested access level, `member` when omitted.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Member record to link the account to.
    #[serde(default)]
    pub member_id: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Payload for [`Service::login`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address or username of the account.
    pub identifier: String,
    /// Plain password to check against the stored hash.
    pub password: String,
}

/// A successful login: the bearer token and the account it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Signed token to present on later requests.
    pub token: String,
    /// The account's wire map, without the password hash.
    pub user: FieldMap,
}

impl Service {
    /// Creates a login account. Public.
    ///
    /// The password is salted and hashed before storage, and the
    /// returned map never carries the hash.
    pub fn register(&self, req: RegisterRequest) -> ApiResult<FieldMap> {
        let mut v = Validator::new();
        if req.password.len() < 8 {
            v.push("password", "must be at least 8 characters");
        }
        v.finish()?;

        let user = User {
            meta: Meta::new(),
            username: req.username,
            email: req.email,
            password_hash: hash_password(&req.password),
            role: req.role.unwrap_or_default(),
            is_active: true,
            is_verified: false,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            member_id: req.member_id,
        };
        user.validate()?;
        self.check_user_uniqueness(&user, None)?;
        self.check_user_links(&user)?;

        let stored = self.store().add(user.into())?;
        self.commit()?;
        present_user(stored.to_map()?)
    }

    /// Signs a caller in by email or username. Public.
    ///
    /// Unknown accounts and wrong passwords fail with the same message,
    /// so a caller cannot probe which addresses are registered.
    pub fn login(&self, req: &LoginRequest) -> ApiResult<Session> {
        let user = self
            .store()
            .all(Some(Kind::User))
            .into_values()
            .find_map(|entity| match entity {
                Entity::User(u)
                    if u.email == req.identifier || u.username == req.identifier =>
                {
                    Some(u)
                }
                _ => None,
            });
        let Some(user) = user else {
            return Err(ApiError::Authentication("invalid credentials".into()));
        };
        if !verify_password(&req.password, &user.password_hash) {
            return Err(ApiError::Authentication("invalid credentials".into()));
        }
        if !user.is_active {
            return Err(ApiError::Authentication("account is disabled".into()));
        }

        let token = self.tokens().issue(&user);
        Ok(Session {
            token,
            user: present_user(Entity::from(user).to_map()?)?,
        })
    }

    /// Resolves a bearer token into a request context. Public.
    ///
    /// Beyond the signature and expiry checks, the account must still
    /// exist and be active, so deleting or disabling a user revokes
    /// their outstanding tokens.
    pub fn verify_token(&self, token: &str) -> ApiResult<RequestContext> {
        let ctx = self.tokens().verify(token)?;
        match self.store().get(Kind::User, &ctx.user_id) {
            Some(Entity::User(user)) if user.is_active => Ok(ctx),
            Some(_) => Err(ApiError::Authentication("account is disabled".into())),
            None => Err(ApiError::Authentication("unknown account".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parish_core::{Store, StoreConfig};
    use std::sync::Arc;

    fn service() -> Service {
        let store = Arc::new(Store::open(StoreConfig::memory()).unwrap());
        Service::new(store, b"test-secret".to_vec())
    }

    fn request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "long enough".into(),
            role: None,
            member_id: None,
            first_name: None,
            last_name: None,
            phone_number: None,
        }
    }

    #[test]
    fn register_defaults_to_member_role() {
        let service = service();
        let map = service
            .register(request("kwame", "kwame@example.com"))
            .unwrap();
        assert_eq!(map["role"], serde_json::json!("member"));
        assert!(map.get("password_hash").is_none());
    }

    #[test]
    fn register_rejects_weak_payloads() {
        let service = service();
        let mut req = request("ab", "not-an-email");
        req.password = "short".into();
        let err = service.register(req).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn register_rejects_taken_email_and_username() {
        let service = service();
        service
            .register(request("kwame", "kwame@example.com"))
            .unwrap();

        let err = service
            .register(request("other", "kwame@example.com"))
            .unwrap_err();
        assert_eq!(err.status_code(), 409);

        let err = service
            .register(request("kwame", "other@example.com"))
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn login_works_by_email_or_username() {
        let service = service();
        let created = service
            .register(request("kwame", "kwame@example.com"))
            .unwrap();
        let id = created["id"].as_str().unwrap();

        for identifier in ["kwame@example.com", "kwame"] {
            let session = service
                .login(&LoginRequest {
                    identifier: identifier.into(),
                    password: "long enough".into(),
                })
                .unwrap();
            let ctx = service.verify_token(&session.token).unwrap();
            assert_eq!(ctx.user_id, id);
            assert_eq!(ctx.role, UserRole::Member);
        }
    }

    #[test]
    fn bad_credentials_are_unauthorized() {
        let service = service();
        service
            .register(request("kwame", "kwame@example.com"))
            .unwrap();

        let err = service
            .login(&LoginRequest {
                identifier: "kwame".into(),
                password: "wrong password".into(),
            })
            .unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = service
            .login(&LoginRequest {
                identifier: "nobody@example.com".into(),
                password: "long enough".into(),
            })
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn disabled_accounts_cannot_sign_in() {
        let service = service();
        let created = service
            .register(request("kwame", "kwame@example.com"))
            .unwrap();
        let id = created["id"].as_str().unwrap();

        match service.store().get(Kind::User, id).unwrap() {
            Entity::User(mut user) => {
                user.is_active = false;
                service.store().add(user.into()).unwrap();
            }
            other => panic!("unexpected entity: {other:?}"),
        }

        let err = service
            .login(&LoginRequest {
                identifier: "kwame".into(),
                password: "long enough".into(),
            })
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn deleting_the_account_revokes_its_tokens() {
        let service = service();
        service
            .register(request("kwame", "kwame@example.com"))
            .unwrap();
        let session = service
            .login(&LoginRequest {
                identifier: "kwame".into(),
                password: "long enough".into(),
            })
            .unwrap();
        assert!(service.verify_token(&session.token).is_ok());

        let id = session.user["id"].as_str().unwrap();
        let entity = service.store().get(Kind::User, id).unwrap();
        service.store().remove(&entity).unwrap();

        let err = service.verify_token(&session.token).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
