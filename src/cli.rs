// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Record id")
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").help("Month filter, YYYY-MM")
}

fn income_cmd() -> Command {
    Command::new("income")
        .about("Record and manage income")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("source").long("source").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
        )
        .subcommand(json_flags(Command::new("list").arg(month_arg())))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("source").long("source"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Record and manage expenses")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("item").long("item").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .arg(month_arg())
                .arg(Arg::new("category").long("category")),
        ))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("item").long("item"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn installment_cmd() -> Command {
    Command::new("installment")
        .about("Installment purchases paid over several months")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("total").long("total").required(true))
                .arg(
                    Arg::new("count")
                        .long("count")
                        .required(true)
                        .help("Number of installments (>= 2)"),
                )
                .arg(Arg::new("paid").long("paid").default_value("0"))
                .arg(Arg::new("start").long("start").help("First due date, defaults to today"))
                .arg(Arg::new("category").long("category").required(true)),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("pay").arg(id_arg()))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("total").long("total"))
                .arg(Arg::new("count").long("count"))
                .arg(Arg::new("paid").long("paid"))
                .arg(Arg::new("start").long("start"))
                .arg(Arg::new("category").long("category")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
        .subcommand(json_flags(Command::new("schedule").arg(id_arg())))
}

fn subscription_cmd() -> Command {
    Command::new("subscription")
        .about("Recurring monthly or annual charges")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("recurrence")
                        .long("recurrence")
                        .default_value("monthly")
                        .help("monthly|annual"),
                )
                .arg(Arg::new("due").long("due").help("Next due date, defaults to today"))
                .arg(Arg::new("category").long("category").required(true)),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("advance").arg(id_arg()))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("recurrence").long("recurrence"))
                .arg(Arg::new("due").long("due"))
                .arg(Arg::new("category").long("category")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Dashboards and reports")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("summary")
                .about("Income, expenses and balance for a month")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("cashflow").about("Income vs expense per month").arg(
                Arg::new("months")
                    .long("months")
                    .value_parser(value_parser!(usize))
                    .default_value("12"),
            ),
        ))
        .subcommand(json_flags(
            Command::new("by-category")
                .about("Spending per category for a month")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("recent").about("Latest transactions").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .default_value("5"),
            ),
        ))
}

pub fn build_cli() -> Command {
    Command::new("moneytrail")
        .version(crate_version!())
        .about("Personal finance: income, expenses, installments, subscriptions")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("User whose records to use (overrides MONEYTRAIL_USER)"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(income_cmd())
        .subcommand(expense_cmd())
        .subcommand(installment_cmd())
        .subcommand(subscription_cmd())
        .subcommand(report_cmd())
        .subcommand(json_flags(
            Command::new("agenda")
                .about("Upcoming installment payments and subscription dues")
                .arg(Arg::new("date").long("date").help("Start date, defaults to today"))
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_parser(value_parser!(i64).range(0..=36_500))
                        .default_value("30"),
                ),
        ))
        .subcommand(
            Command::new("budget")
                .about("Budget recommendations")
                .subcommand_required(true)
                .subcommand(
                    Command::new("recommend")
                        .about("Ask the advisor service for budget advice")
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Read and write settings")
                .subcommand_required(true)
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
