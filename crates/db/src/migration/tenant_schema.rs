//! Per-tenant schema DDL.
//!
//! Executed once when a tenant is provisioned, inside the provisioning
//! transaction and after `search_path` points at the new schema. Every
//! foreign key stays inside the tenant's schema.

/// Tables, constraints, and indexes of one tenant namespace.
pub const TENANT_TABLES_SQL: &str = r"
CREATE TABLE accounts (
    id              UUID PRIMARY KEY,
    code            VARCHAR(20) NOT NULL UNIQUE,
    name            VARCHAR(255) NOT NULL,
    account_type    VARCHAR(16) NOT NULL
                    CHECK (account_type IN ('asset', 'liability', 'equity', 'revenue', 'expense')),
    parent_id       UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    is_system       BOOLEAN NOT NULL DEFAULT FALSE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE INDEX idx_accounts_parent ON accounts(parent_id);

CREATE TABLE journal_entries (
    id              UUID PRIMARY KEY,
    entry_number    BIGINT UNIQUE,
    entry_date      DATE NOT NULL,
    description     TEXT NOT NULL,
    reference       VARCHAR(100),
    status          VARCHAR(16) NOT NULL DEFAULT 'draft'
                    CHECK (status IN ('draft', 'posted', 'void')),
    reversal_of     UUID REFERENCES journal_entries(id) ON DELETE RESTRICT,
    created_by      UUID NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    posted_by       UUID,
    posted_at       TIMESTAMPTZ,
    voided_by       UUID,
    voided_at       TIMESTAMPTZ,
    void_reason     TEXT,
    CHECK ((status = 'draft') = (entry_number IS NULL)),
    CHECK ((status = 'draft') = (posted_at IS NULL)),
    CHECK ((status = 'void') = (voided_at IS NOT NULL))
);

CREATE INDEX idx_journal_entries_date ON journal_entries(entry_date, entry_number);
CREATE INDEX idx_journal_entries_status ON journal_entries(status);
CREATE UNIQUE INDEX idx_journal_entries_reversal_of ON journal_entries(reversal_of)
    WHERE reversal_of IS NOT NULL;

CREATE TABLE journal_entry_lines (
    id              UUID PRIMARY KEY,
    entry_id        UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number     INTEGER NOT NULL CHECK (line_number > 0),
    account_id      UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    debit           NUMERIC(19, 2) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit          NUMERIC(19, 2) NOT NULL DEFAULT 0 CHECK (credit >= 0),
    description     TEXT,
    CHECK ((debit > 0) <> (credit > 0)),
    UNIQUE (entry_id, line_number)
);

CREATE INDEX idx_journal_entry_lines_account ON journal_entry_lines(account_id);

CREATE TABLE entry_sequence (
    id              SMALLINT PRIMARY KEY CHECK (id = 1),
    next_number     BIGINT NOT NULL CHECK (next_number > 0)
);

INSERT INTO entry_sequence (id, next_number) VALUES (1, 1);
";
