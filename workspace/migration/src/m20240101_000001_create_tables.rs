use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create servidores table
        manager
            .create_table(
                Table::create()
                    .table(Servidores::Table)
                    .if_not_exists()
                    .col(pk_auto(Servidores::Id))
                    .col(string(Servidores::Nome))
                    .col(string_null(Servidores::Email))
                    .col(string_null(Servidores::Telefone))
                    .col(string(Servidores::Status).default("ativo"))
                    .col(string_null(Servidores::Setor))
                    .col(string_null(Servidores::Cargo))
                    .col(date_null(Servidores::DataNascimento))
                    .col(date_null(Servidores::DataAdmissao))
                    .col(date_null(Servidores::DataDemissao))
                    .col(string_null(Servidores::Foto))
                    .to_owned(),
            )
            .await?;

        // Create enderecos table, one address per servidor
        manager
            .create_table(
                Table::create()
                    .table(Enderecos::Table)
                    .if_not_exists()
                    .col(pk_auto(Enderecos::Id))
                    .col(integer(Enderecos::ServidorId).unique_key())
                    .col(string_null(Enderecos::Logradouro))
                    .col(string_null(Enderecos::Numero))
                    .col(string_null(Enderecos::Complemento))
                    .col(string_null(Enderecos::Bairro))
                    .col(string_null(Enderecos::Cidade))
                    .col(string_null(Enderecos::Estado))
                    .col(string_null(Enderecos::Cep))
                    .col(string(Enderecos::Pais).default("Brasil"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_endereco_servidor")
                            .from(Enderecos::Table, Enderecos::ServidorId)
                            .to(Servidores::Table, Servidores::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create ferias table
        manager
            .create_table(
                Table::create()
                    .table(Ferias::Table)
                    .if_not_exists()
                    .col(pk_auto(Ferias::Id))
                    .col(integer(Ferias::ServidorId))
                    .col(date(Ferias::DataInicio))
                    .col(date(Ferias::DataFim))
                    .col(integer(Ferias::Dias))
                    .col(integer(Ferias::AnoReferencia))
                    .col(string(Ferias::Status).default("programadas"))
                    .col(text_null(Ferias::Observacoes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ferias_servidor")
                            .from(Ferias::Table, Ferias::ServidorId)
                            .to(Servidores::Table, Servidores::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ferias_servidor_id")
                    .table(Ferias::Table)
                    .col(Ferias::ServidorId)
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Nome))
                    .col(string(Users::Email).unique_key())
                    .col(string_len(Users::Role, 20).default("user"))
                    .col(string(Users::PasswordHash))
                    .col(string_null(Users::ResetTokenHash))
                    .col(timestamp_with_time_zone_null(Users::ResetTokenExpiresAt))
                    .col(boolean(Users::Ativo).default(true))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ferias::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enderecos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Servidores::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Servidores {
    Table,
    Id,
    Nome,
    Email,
    Telefone,
    Status,
    Setor,
    Cargo,
    DataNascimento,
    DataAdmissao,
    DataDemissao,
    Foto,
}

#[derive(DeriveIden)]
enum Enderecos {
    Table,
    Id,
    ServidorId,
    Logradouro,
    Numero,
    Complemento,
    Bairro,
    Cidade,
    Estado,
    Cep,
    Pais,
}

#[derive(DeriveIden)]
enum Ferias {
    Table,
    Id,
    ServidorId,
    DataInicio,
    DataFim,
    Dias,
    AnoReferencia,
    Status,
    Observacoes,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Nome,
    Email,
    Role,
    PasswordHash,
    ResetTokenHash,
    ResetTokenExpiresAt,
    Ativo,
}
