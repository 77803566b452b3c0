// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Public-key authentication with a single private-key credential.
//!
//! The only supported method is an unencrypted private key file. No
//! password, agent, or multi-key fallback: a key that fails to load or a
//! server that rejects it both surface as a per-host authentication
//! failure at connect time.

use russh::client::{Handle, Handler};
use russh::keys::{PrivateKey, PrivateKeyWithHashAlg};
use std::path::Path;
use std::sync::Arc;

use super::error::Error;

/// Load and parse the private key from disk.
pub fn load_private_key(path: &Path) -> Result<PrivateKey, Error> {
    russh::keys::load_secret_key(path, None).map_err(Error::KeyInvalid)
}

/// Authenticate an established connection with the given key.
pub(super) async fn authenticate<H: Handler>(
    handle: &mut Handle<H>,
    username: &str,
    key: PrivateKey,
) -> Result<(), Error> {
    let hash_alg = handle.best_supported_rsa_hash().await?.flatten();
    let auth_result = handle
        .authenticate_publickey(
            username,
            PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
        )
        .await?;
    if !auth_result.success() {
        return Err(Error::KeyAuthFailed);
    }
    Ok(())
}
