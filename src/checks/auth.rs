//! Authentication check: JWT handling, password hashing, protected routes.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{python_files, read_lossy, CheckProducer};

static JWT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"jwt\.(?:encode|decode)\s*\(|OAuth2PasswordBearer\s*\(").unwrap()
});

static HASHING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CryptContext\s*\(|bcrypt\.|pwd_context").unwrap());

static PROTECTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Depends\s*\(\s*(?:get_current_user|oauth2_scheme)").unwrap()
});

pub struct AuthCheck;

impl CheckProducer for AuthCheck {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let mut jwt_working = false;
        let mut password_hashing = false;
        let mut protected_routes = false;

        for path in python_files(repo, 4) {
            let Some(source) = read_lossy(&path) else {
                continue;
            };
            jwt_working |= JWT_RE.is_match(&source);
            password_hashing |= HASHING_RE.is_match(&source);
            protected_routes |= PROTECTED_RE.is_match(&source);
        }

        Ok(json!({
            "jwt_working": jwt_working,
            "password_hashing": password_hashing,
            "protected_routes": protected_routes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;

    #[test]
    fn detects_full_auth_stack() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("auth.py"),
            indoc! {r#"
                from jose import jwt
                from passlib.context import CryptContext
                from fastapi import Depends
                from fastapi.security import OAuth2PasswordBearer

                pwd_context = CryptContext(schemes=["bcrypt"])
                oauth2_scheme = OAuth2PasswordBearer(tokenUrl="token")

                def make_token(data):
                    return jwt.encode(data, "secret")

                def me(token: str = Depends(oauth2_scheme)):
                    return token
            "#},
        )
        .unwrap();

        let value = AuthCheck.run(dir.path()).unwrap();
        assert_eq!(value["jwt_working"], true);
        assert_eq!(value["password_hashing"], true);
        assert_eq!(value["protected_routes"], true);
    }

    #[test]
    fn plain_repo_has_no_auth() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "app = None\n").unwrap();

        let value = AuthCheck.run(dir.path()).unwrap();
        assert_eq!(value["jwt_working"], false);
        assert_eq!(value["password_hashing"], false);
        assert_eq!(value["protected_routes"], false);
    }
}
