// SPDX-License-Identifier: Apache-2.0

mod read_ext;

mod write_ext;

pub(crate) use read_ext::ReadExt;

pub(crate) use write_ext::WriteExt;
