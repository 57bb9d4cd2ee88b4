//! Fixed support types
//!
//! Written once per run next to the generated entities. Generated files
//! import `Media`/`User` from here; `Payload` wraps API responses.

/// A fixed output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoilerplateFile {
    pub file_name: &'static str,
    pub contents: &'static str,
}

const PAYLOAD: &str = "\
export interface Payload<T> {
  data: T;
  meta: {
    pagination?: {
      page: number;
      pageSize: number;
      pageCount: number;
      total: number;
    }
  };
}
";

const USER: &str = "\
export const UserAPI = \"plugin::users-permissions.user\";

export interface User {
  id: number;
  attributes: {
    username: string;
    email: string;
    provider: string;
    confirmed: boolean;
    blocked: boolean;
    createdAt: Date;
    updatedAt: Date;
  }
}

export type FlatUser = User['attributes'];

export type CM_User = FlatUser;
";

const MEDIA_FORMAT: &str = "\
export interface MediaFormat {
  name: string;
  hash: string;
  ext: string;
  mime: string;
  width: number;
  height: number;
  size: number;
  path: string;
  url: string;
}
";

const MEDIA: &str = "\
import { MediaFormat } from './MediaFormat';

export interface Media {
  id: number;
  attributes: {
    name: string;
    alternativeText: string;
    caption: string;
    width: number;
    height: number;
    formats: { thumbnail: MediaFormat; medium: MediaFormat; small: MediaFormat; };
    hash: string;
    ext: string;
    mime: string;
    size: number;
    url: string;
    previewUrl: string;
    provider: string;
    createdAt: Date;
    updatedAt: Date;
  }
}

export type FlatMedia = Media['attributes'];

export type CM_Media = FlatMedia;
";

/// All support files, in write order
pub fn files() -> [BoilerplateFile; 4] {
    [
        BoilerplateFile {
            file_name: "Payload.ts",
            contents: PAYLOAD,
        },
        BoilerplateFile {
            file_name: "User.ts",
            contents: USER,
        },
        BoilerplateFile {
            file_name: "MediaFormat.ts",
            contents: MEDIA_FORMAT,
        },
        BoilerplateFile {
            file_name: "Media.ts",
            contents: MEDIA,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::names::{MEDIA_TYPE, USER_TYPE};

    #[test]
    fn test_referenced_types_are_exported() {
        let files = files();
        let user = files.iter().find(|f| f.file_name == "User.ts").unwrap();
        let media = files.iter().find(|f| f.file_name == "Media.ts").unwrap();

        assert!(user.contents.contains(&format!("export interface {USER_TYPE} ")));
        assert!(user.contents.contains("export type CM_User"));
        assert!(media.contents.contains(&format!("export interface {MEDIA_TYPE} ")));
        assert!(media.contents.contains("export type CM_Media"));
    }

    #[test]
    fn test_media_imports_format() {
        let media = files()[3];
        assert!(media.contents.starts_with("import { MediaFormat } from './MediaFormat';"));
    }
}
