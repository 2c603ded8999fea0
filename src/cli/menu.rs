//! Interactive numbered menu over the catalog.
//!
//! Reads from any `BufRead` and writes to any `Write`, so the same loop runs
//! against a terminal or an in-memory script. End of input behaves like `0`.

use std::io::{self, BufRead, Write};

use crate::core::{parse_copies, CatalogError, CatalogStore};
use crate::domain::{BookId, MemberId};

const RULE_WIDTH: usize = 70;

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    ListBooks,
    Borrow,
    Return,
    AddMember,
    ListMembers,
    Exit,
}

impl MenuChoice {
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::AddBook),
            2 => Some(Self::ListBooks),
            3 => Some(Self::Borrow),
            4 => Some(Self::Return),
            5 => Some(Self::AddMember),
            6 => Some(Self::ListMembers),
            0 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Truncate to at most `max` characters (not bytes)
fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Text menu bound to a store and a pair of streams
pub struct Menu<'a, R, W> {
    store: &'a mut CatalogStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut CatalogStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Run until the user picks Exit or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;

            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let choice = match line.parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    writeln!(self.output, "Please enter a valid number.")?;
                    continue;
                }
            };

            let Some(choice) = MenuChoice::from_number(choice) else {
                writeln!(self.output, "Invalid choice. Please select 0-6.")?;
                continue;
            };

            let keep_going = match choice {
                MenuChoice::AddBook => self.add_book()?,
                MenuChoice::ListBooks => self.list_books()?,
                MenuChoice::Borrow => self.borrow()?,
                MenuChoice::Return => self.return_book()?,
                MenuChoice::AddMember => self.add_member()?,
                MenuChoice::ListMembers => self.list_members()?,
                MenuChoice::Exit => false,
            };

            if !keep_going {
                break;
            }
        }

        writeln!(self.output, "Thank you for using the library catalog!")?;
        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let rule = "=".repeat(30);
        writeln!(self.output)?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "{:^30}", "LIBRARY MANAGEMENT")?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "1. Add book")?;
        writeln!(self.output, "2. List books")?;
        writeln!(self.output, "3. Borrow book")?;
        writeln!(self.output, "4. Return book")?;
        writeln!(self.output, "5. Add member")?;
        writeln!(self.output, "6. List members")?;
        writeln!(self.output, "0. Exit")?;
        writeln!(self.output, "{}", rule)
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, result: Result<String, CatalogError>) -> io::Result<()> {
        match result {
            Ok(message) => writeln!(self.output, "✓ {}", message),
            Err(e) => writeln!(self.output, "✗ {}", e),
        }
    }

    // Each action returns Ok(false) when input ran out mid-prompt.

    fn add_book(&mut self) -> io::Result<bool> {
        let Some(title) = self.prompt("Enter book title: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Enter the book author: ")? else {
            return Ok(false);
        };
        let Some(copies) = self.prompt("How many copies: ")? else {
            return Ok(false);
        };

        let result = parse_copies(&copies)
            .and_then(|copies| self.store.add_book(&title, &author, copies))
            .map(|id| format!("Book added successfully! ID: {}", id));
        self.report(result)?;
        Ok(true)
    }

    fn add_member(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter the name: ")? else {
            return Ok(false);
        };
        let Some(email) = self.prompt("Please enter the email: ")? else {
            return Ok(false);
        };

        let result = self
            .store
            .add_member(&name, &email)
            .map(|id| format!("Member added successfully! ID: {}", id));
        self.report(result)?;
        Ok(true)
    }

    fn list_books(&mut self) -> io::Result<bool> {
        if self.store.list_books().is_empty() {
            writeln!(self.output, "No books found in the library.")?;
            return Ok(true);
        }

        writeln!(self.output)?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "{:<12} {:<25} {:<20} Copies", "ID", "Title", "Author")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        for book in self.store.list_books() {
            writeln!(
                self.output,
                "{:<12} {:<25} {:<20} {}/{}",
                book.id.as_str(),
                clip(&book.title, 24),
                clip(&book.author, 19),
                book.available_copies,
                book.total_copies
            )?;
        }
        writeln!(self.output)?;
        Ok(true)
    }

    fn list_members(&mut self) -> io::Result<bool> {
        if self.store.list_members().is_empty() {
            writeln!(self.output, "No members found.")?;
            return Ok(true);
        }

        writeln!(self.output)?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "{:<12} {:<25} {:<30}", "ID", "Name", "Email")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        for member in self.store.list_members() {
            writeln!(
                self.output,
                "{:<12} {:<25} {:<30}",
                member.id.as_str(),
                clip(&member.name, 24),
                clip(&member.email, 29)
            )?;
            if member.has_loans() {
                writeln!(
                    self.output,
                    "  Currently borrowed: {} book(s)",
                    member.borrowed.len()
                )?;
                for record in &member.borrowed {
                    writeln!(
                        self.output,
                        "    - {} (borrowed on {})",
                        record.title, record.borrowed_on
                    )?;
                }
            }
        }
        writeln!(self.output)?;
        Ok(true)
    }

    fn borrow(&mut self) -> io::Result<bool> {
        let Some(member_id) = self.prompt("Enter your membership ID: ")? else {
            return Ok(false);
        };
        let member_id = MemberId::from(member_id);

        // Reject an unknown member before asking for the book
        if self.store.member(&member_id).is_none() {
            self.report(Err(CatalogError::MemberNotFound(member_id)))?;
            return Ok(true);
        }

        let Some(book_id) = self.prompt("Enter book ID: ")? else {
            return Ok(false);
        };

        let result = self
            .store
            .borrow(&member_id, &BookId::from(book_id))
            .map(|receipt| receipt.to_string());
        self.report(result)?;
        Ok(true)
    }

    fn return_book(&mut self) -> io::Result<bool> {
        let Some(member_id) = self.prompt("Enter the member ID: ")? else {
            return Ok(false);
        };
        let member_id = MemberId::from(member_id);

        let Some(member) = self.store.member(&member_id) else {
            self.report(Err(CatalogError::MemberNotFound(member_id)))?;
            return Ok(true);
        };

        if !member.has_loans() {
            self.report(Err(CatalogError::InvalidSelection {
                selector: 0,
                loans: 0,
            }))?;
            return Ok(true);
        }

        let lines: Vec<String> = member
            .borrowed
            .iter()
            .enumerate()
            .map(|(i, record)| {
                format!(
                    "{}. {} ({}) - Borrowed on {}",
                    i + 1,
                    record.title,
                    record.book_id,
                    record.borrowed_on
                )
            })
            .collect();

        writeln!(self.output)?;
        writeln!(self.output, "Borrowed books:")?;
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }

        let Some(choice) = self.prompt("Enter number to return: ")? else {
            return Ok(false);
        };

        // Menu numbers are 1-based
        let selector = match choice.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
            Some(selector) => selector,
            None => {
                self.report(Err(CatalogError::invalid_input(format!(
                    "Invalid input: '{}'",
                    choice
                ))))?;
                return Ok(true);
            }
        };

        let result = self
            .store
            .return_book(&member_id, selector)
            .map(|receipt| receipt.to_string());
        self.report(result)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_script(store: &mut CatalogStore, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(store, script.as_bytes(), &mut output).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    fn open_temp() -> (TempDir, CatalogStore) {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::open(temp.path().join("data.json")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_menu_choice_numbers() {
        assert_eq!(MenuChoice::from_number(1), Some(MenuChoice::AddBook));
        assert_eq!(MenuChoice::from_number(0), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::from_number(7), None);
    }

    #[test]
    fn test_clip_counts_chars() {
        assert_eq!(clip("héllo wörld", 5), "héllo");
        assert_eq!(clip("abc", 10), "abc");
    }

    #[test]
    fn test_exit_immediately() {
        let (_temp, mut store) = open_temp();
        let out = run_script(&mut store, "0\n");
        assert!(out.contains("1. Add book"));
        assert!(out.contains("Thank you"));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let (_temp, mut store) = open_temp();
        let out = run_script(&mut store, "");
        assert!(out.contains("Thank you"));
    }

    #[test]
    fn test_bad_choices_reprompt() {
        let (_temp, mut store) = open_temp();
        let out = run_script(&mut store, "abc\n9\n0\n");
        assert!(out.contains("Please enter a valid number."));
        assert!(out.contains("Invalid choice. Please select 0-6."));
    }

    #[test]
    fn test_add_book_with_bad_copies() {
        let (_temp, mut store) = open_temp();
        let out = run_script(&mut store, "1\nDune\nHerbert\nlots\n0\n");
        assert!(out.contains("✗ Invalid number of copies: 'lots'"));
        assert!(store.list_books().is_empty());
    }

    #[test]
    fn test_add_and_list() {
        let (_temp, mut store) = open_temp();
        let out = run_script(
            &mut store,
            "1\nDune\nHerbert\n2\n5\nAda\nada@x.io\n2\n6\n0\n",
        );
        assert!(out.contains("✓ Book added successfully! ID: B-"));
        assert!(out.contains("✓ Member added successfully! ID: M-"));
        assert!(out.contains("Dune"));
        assert!(out.contains("2/2"));
        assert!(out.contains("ada@x.io"));
        assert_eq!(store.list_books().len(), 1);
        assert_eq!(store.list_members().len(), 1);
    }

    #[test]
    fn test_borrow_and_return_flow() {
        let (_temp, mut store) = open_temp();
        let book = store.add_book("Dune", "Herbert", 1).unwrap();
        let member = store.add_member("Ada", "ada@x.io").unwrap();

        let script = format!("3\n{m}\n{b}\n3\n{m}\n{b}\n4\n{m}\n1\n0\n", m = member, b = book);
        let out = run_script(&mut store, &script);

        assert!(out.contains("✓ Book 'Dune' borrowed successfully!"));
        assert!(out.contains("✗ No copies of 'Dune' available"));
        assert!(out.contains("1. Dune ("));
        assert!(out.contains("✓ Book 'Dune' returned successfully!"));
        assert_eq!(store.book(&book).unwrap().available_copies, 1);
        assert!(store.member(&member).unwrap().borrowed.is_empty());
    }

    #[test]
    fn test_borrow_unknown_member_skips_book_prompt() {
        let (_temp, mut store) = open_temp();
        let out = run_script(&mut store, "3\nM-NOPE0\n0\n");
        assert!(out.contains("✗ Member not found: M-NOPE0"));
        assert!(!out.contains("Enter book ID"));
    }

    #[test]
    fn test_return_without_loans() {
        let (_temp, mut store) = open_temp();
        let member = store.add_member("Ada", "ada@x.io").unwrap();
        let out = run_script(&mut store, &format!("4\n{}\n0\n", member));
        assert!(out.contains("✗ No borrowed books to return"));
    }

    #[test]
    fn test_return_rejects_zero_and_out_of_range() {
        let (_temp, mut store) = open_temp();
        let book = store.add_book("Dune", "Herbert", 1).unwrap();
        let member = store.add_member("Ada", "ada@x.io").unwrap();
        store.borrow(&member, &book).unwrap();

        let script = format!("4\n{m}\n0\n4\n{m}\n3\n0\n", m = member);
        let out = run_script(&mut store, &script);
        assert!(out.contains("✗ Invalid input: '0'"));
        assert!(out.contains("✗ Invalid selection: 3 (member has 1 borrowed book(s))"));
        assert_eq!(store.member(&member).unwrap().borrowed.len(), 1);
    }
}
