//! `privguard identity`

use std::io::Write;

use clap::Args;

use privguard_core::{generate_identity, FakeIdentity};

use crate::commands::write_json;
use crate::error::AppError;

#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// # Errors
///
/// Returns [`AppError::Io`] if the output cannot be written.
pub fn generate(args: &IdentityArgs, out: &mut dyn Write) -> Result<(), AppError> {
    render(&generate_identity(), args.json, out)
}

fn render(identity: &FakeIdentity, json: bool, out: &mut dyn Write) -> Result<(), AppError> {
    if json {
        return write_json(out, identity);
    }
    writeln!(out, "Name:     {}", identity.name)?;
    writeln!(out, "Username: {}", identity.username)?;
    writeln!(out, "Email:    {}", identity.email)?;
    writeln!(out, "Password: {}", identity.password)?;
    writeln!(out, "Avatar:   {}", identity.avatar)?;
    writeln!(out, "Bio:      {}", identity.bio)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn text_has_every_field() {
        let identity = privguard_core::generate_identity_with(&mut StdRng::seed_from_u64(3));
        let mut out = Vec::new();
        render(&identity, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains(&identity.email));
        assert!(text.contains(&identity.password));
    }

    #[test]
    fn json_round_trips() {
        let mut out = Vec::new();
        generate(&IdentityArgs { json: true }, &mut out).unwrap();
        let parsed: FakeIdentity = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.password.chars().count(), 12);
    }
}
