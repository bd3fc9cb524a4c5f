/* This file is part of FundForward (https://fundforward.app)
 *
 * Copyright (C) 2023-2026 FundForward contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */


use prettytable::{format, row, Table};

use fundforward::{
    campaign::{Campaign, Donation},
    proposal::Proposal,
    util::time::{days_left, millis_to_date},
    view::{Notification, NotificationLevel},
};

pub fn print_campaigns(campaigns: &[Campaign], now: u64) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["#", "Title", "Owner", "Collected", "Target", "Deadline", "Days left"]);

    for c in campaigns {
        table.add_row(row![
            c.index,
            c.title,
            c.owner,
            c.amount_collected,
            c.target,
            millis_to_date(c.deadline),
            days_left(c.deadline, now)
        ]);
    }

    if table.is_empty() {
        println!("No campaigns found");
    } else {
        println!("{}", table);
    }
}

pub fn print_proposals(proposals: &[Proposal]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["#", "Description", "For", "Against", "Voted", "Status"]);

    for p in proposals {
        let voted = match p.voted {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        let status = if p.open { "open" } else { "closed" };

        table.add_row(row![p.index, p.description, p.votes_for, p.votes_against, voted, status]);
    }

    if table.is_empty() {
        println!("No proposals found");
    } else {
        println!("{}", table);
    }
}

pub fn print_donations(donations: &[Donation]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Donor", "Amount"]);

    for d in donations {
        table.add_row(row![d.donor, d.amount]);
    }

    if table.is_empty() {
        println!("No donations yet");
    } else {
        println!("{}", table);
    }
}

pub fn print_notification(note: &Notification) {
    match note.level {
        NotificationLevel::Success => println!("{}", note.message),
        NotificationLevel::Warning => eprintln!("Warning: {}", note.message),
        NotificationLevel::Error => eprintln!("Error: {}", note.message),
    }
}
