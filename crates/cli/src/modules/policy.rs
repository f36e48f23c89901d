/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{Context, UnwrapResult};

/// Print the configuration after file, environment and flag overrides
pub fn exec(ctx: &Context) {
    print!(
        "{}",
        ctx.config.to_toml().unwrap_result("render configuration")
    );
}
