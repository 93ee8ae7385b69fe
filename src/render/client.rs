//! Typed client emitted after the table types.
//!
//! `SurrealX` wraps the JavaScript SDK's `Surreal` class with methods keyed
//! on `TableName`, so every call is checked against `TableTypes`.

pub(super) const CLIENT_IMPORT: &str = "import Surreal from 'surrealdb';\n";

/// Helper types used by the client methods.
pub(super) const CLIENT_HELPER_TYPES: &str = r#"export type WithId<T> = T & { id: string };

export type DeepPartial<T> = T extends object ? { [P in keyof T]?: DeepPartial<T[P]> } : T;

/** Slash-separated paths into the properties of `T`, e.g. `name/first` */
export type SlashPath<T> = T extends readonly unknown[]
  ? never
  : T extends object
  ? { [K in keyof T & string]: K | `${K}/${SlashPath<T[K]>}` }[keyof T & string]
  : never;

/** Type of the property of `T` at `Path`, e.g. `PropType<User, "name/first">` */
export type PropType<T, Path extends string> = string extends Path
  ? unknown
  : Path extends keyof T
  ? T[Path]
  : Path extends `${infer K}/${infer R}`
  ? K extends keyof T
    ? PropType<NonNullable<T[K]>, R>
    : unknown
  : unknown;

export type PathAndValue<T> = {
  [Path in SlashPath<T>]: { path: `/${Path}`; value: PropType<T, Path> };
}[SlashPath<T>];

export type AddPatchX<T> = { op: "add" } & PathAndValue<T>;
export type RemovePatchX<T> = { op: "remove"; path: `/${SlashPath<T>}` };
export type ReplacePatchX<T> = { op: "replace" } & PathAndValue<T>;
export type ChangePatchX<T> = { op: "change" } & PathAndValue<T>;

/** JSON Patch operation checked against the table type `T` */
export type PatchX<T> = AddPatchX<T> | RemovePatchX<T> | ReplacePatchX<T> | ChangePatchX<T>;
"#;

pub(super) const CLIENT_CLASS: &str = r#"export class SurrealX extends Surreal {
  constructor(url?: string, token?: string) {
    super(url, token);
  }

  /** Select every record of a table. */
  async selectAllX<T extends TableName>(thing: T): Promise<WithId<TableTypes[T]>[]> {
    return (await super.select(thing)) as any;
  }

  /** Select one record by id. */
  async selectX<T extends TableName>(thing: Id<T>): Promise<WithId<TableTypes[T]> | undefined> {
    const result = await super.select(thing);
    return (result as any)[0];
  }

  /** Create a record with a random id (`thing` is a table) or a given id. */
  async createX<T extends TableName>(
    thing: T | Id<T>,
    data: TableTypes[T]
  ): Promise<WithId<TableTypes[T]>> {
    return (await super.create(thing, data)) as any;
  }

  /** Replace the content of every record of a table. */
  async updateAllX<T extends TableName>(
    thing: T,
    data: TableTypes[T]
  ): Promise<WithId<TableTypes[T]>[]> {
    return (await super.update(thing, data)) as any;
  }

  /** Replace the content of one record. */
  async updateX<T extends TableName>(
    thing: Id<T>,
    data: TableTypes[T]
  ): Promise<WithId<TableTypes[T]>> {
    return (await super.update(thing, data)) as any;
  }

  /** Merge `data` into every record of a table, or into one record. */
  async changeX<T extends TableName>(
    thing: T | Id<T>,
    data: DeepPartial<TableTypes[T]>
  ): Promise<WithId<TableTypes[T]>> {
    return (await super.change(thing, data)) as any;
  }

  /** Apply JSON Patch operations to every record of a table. */
  async modifyAllX<T extends TableName>(
    thing: T,
    data?: PatchX<TableTypes[T]>[]
  ): Promise<PatchX<TableTypes[T]>[][]> {
    return (await super.modify(thing, data as any)) as any;
  }

  /** Apply JSON Patch operations to one record. */
  async modifyX<T extends TableName>(
    thing: Id<T>,
    data?: PatchX<TableTypes[T]>[]
  ): Promise<PatchX<TableTypes[T]>[]> {
    return (await super.modify(thing, data as any)) as any;
  }

  /** Delete every record of a table, or one record. */
  async deleteX<T extends TableName>(thing: T | Id<T>): Promise<void> {
    await super.delete(thing);
  }
}
"#;

/// Names the generated module declares besides the table types.
pub(super) const DECLARED_NAMES: &[&str] = &[
    "Surreal",
    "Id",
    "TableName",
    "TableTypes",
    "WithId",
    "DeepPartial",
    "SlashPath",
    "PropType",
    "PathAndValue",
    "AddPatchX",
    "RemovePatchX",
    "ReplacePatchX",
    "ChangePatchX",
    "PatchX",
    "SurrealX",
];
