//! Test fixtures: fake inputs and a ready-made distribution.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use nossis_distribution::{build, CreatedDistribution};

use crate::client::ClientHandle;
use crate::errors::HarnessError;

const HOST_PREFIXES: &[&str] = &["web", "www", "db", "lt", "desktop", "laptop", "srv", "email"];

const DOMAIN_WORDS: &[&str] = &[
    "alvarez", "bennett", "castillo", "dawson", "ellis", "foster", "garcia", "hughes", "jensen",
    "kim", "lopez", "morgan", "nguyen", "owens", "patel", "reyes", "santos", "walsh",
];

const TLDS: &[&str] = &["com", "net", "org", "info", "biz"];

/// A plausible, made-up hostname such as `web-42.lopez.com`
pub fn fake_hostname<R: Rng + ?Sized>(rng: &mut R) -> String {
    // All three lists are non-empty constants.
    let prefix = HOST_PREFIXES.choose(rng).copied().unwrap_or("web");
    let word = DOMAIN_WORDS.choose(rng).copied().unwrap_or("example");
    let tld = TLDS.choose(rng).copied().unwrap_or("com");
    format!("{}-{:02}.{}.{}", prefix, rng.gen_range(0..100), word, tld)
}

/// Current UTC time in RFC 3339 form, the conventional caller reference
pub fn caller_reference_now() -> String {
    Utc::now().to_rfc3339()
}

/// Create the canonical distribution for a fake origin
pub fn distribution(client: &ClientHandle<'_>) -> Result<CreatedDistribution, HarnessError> {
    let hostname = fake_hostname(&mut rand::thread_rng());
    distribution_for(client, &hostname, &caller_reference_now())
}

/// Create the canonical distribution for `hostname`
pub fn distribution_for(
    client: &ClientHandle<'_>,
    hostname: &str,
    caller_reference: &str,
) -> Result<CreatedDistribution, HarnessError> {
    let config = build(hostname, caller_reference)?;
    client.create_distribution(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fake_hostname_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let hostname = fake_hostname(&mut rng);
            let labels: Vec<&str> = hostname.split('.').collect();

            assert_eq!(labels.len(), 3);
            assert!(labels.iter().all(|label| !label.is_empty()));
            assert!(hostname.is_ascii());
        }
    }

    #[test]
    fn test_caller_reference_is_timestamp() {
        let reference = caller_reference_now();
        assert!(chrono::DateTime::parse_from_rfc3339(&reference).is_ok());
    }
}
